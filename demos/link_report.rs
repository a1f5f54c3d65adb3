use mozscape_http::{LinksOptions, MozscapeClient, MozscapeError, TopPagesOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let moz = MozscapeClient::from_env().map_err(anyhow::Error::msg)?;
    let target = std::env::args().nth(1).unwrap_or_else(|| "moz.com".to_owned());

    let options = LinksOptions::new()
        .sort("page_authority")
        .filter(["external", "follow"])
        .source_cols(["url", "page_authority"])
        .link_cols(["anchor_text", "flags"]);

    match moz.links(&target, "page_to_page", &options).await {
        Ok(links) => println!("links: {links}"),
        Err(MozscapeError::Api(err)) => {
            eprintln!("links failed ({}): {}", err.status, err.message);
            eprintln!("request: {} {}", err.request.method, err.request.uri);
        }
        Err(err) => return Err(err.into()),
    }

    let anchors = moz
        .anchor_text(&target, "phrase_to_page", ["phrase", "external_domains_linking"])
        .await?;
    println!("anchor text: {anchors}");

    let pages = moz
        .top_pages(&target, ["url", "page_authority"], &TopPagesOptions::new().limit(10))
        .await?;
    println!("top pages: {pages}");

    Ok(())
}

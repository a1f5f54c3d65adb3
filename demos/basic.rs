use mozscape_http::{MetadataOption, MozscapeClient, URL_METRICS_FLAGS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let moz = MozscapeClient::from_env().map_err(anyhow::Error::msg)?;
    let target = std::env::args().nth(1).unwrap_or_else(|| "moz.com".to_owned());

    let cols = ["title", "url", "page_authority", "domain_authority"];
    let unknown = URL_METRICS_FLAGS.unknown(cols);
    if !unknown.is_empty() {
        anyhow::bail!("unknown columns: {unknown:?}");
    }

    let updated = moz.metadata(MetadataOption::LastUpdate).await?;
    println!("index last updated: {updated}");

    let metrics = moz.url_metrics(&target, cols).await?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    Ok(())
}

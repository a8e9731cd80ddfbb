use vod_catalog_core::catalog::list_params;

use super::Context;

pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    let client = ctx.api.client();
    let proxies = client.proxies();
    let params = list_params(1, None, None);

    println!("API: {}", ctx.config.api.base_url);
    println!("Cursor policy: {:?}", ctx.config.proxies.cursor_policy);
    println!();
    println!("{:<4} {:<50} {}", "#", "PREFIX", "RESULT");
    println!("{}", "-".repeat(80));

    let mut working = 0;
    for (slot, prefix) in proxies.iter().enumerate() {
        let shown = if prefix.is_empty() { "(direct)" } else { prefix };
        match client.probe(slot, &params).await {
            Ok(elapsed) => {
                working += 1;
                println!("{:<4} {:<50} ✓ {} ms", slot + 1, shown, elapsed.as_millis());
            }
            Err(e) => {
                println!("{:<4} {:<50} ✗ {}", slot + 1, shown, e);
            }
        }
    }

    println!();
    println!("{}/{} proxies working", working, proxies.len());
    Ok(())
}

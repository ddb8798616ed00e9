use steamcheck_sdk::{SteamApiClient, DEFAULT_API_BASE_URL};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api = std::env::var("STEAMCHECK_API_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    let key = std::env::var("STEAM_API_KEY")
        .expect("set STEAM_API_KEY before running the example");
    let vanity = std::env::args().nth(1).unwrap_or_else(|| "gabelogannewell".to_string());

    let client = SteamApiClient::new(api, key)?;
    let lookup = client.resolve_vanity_url(&vanity).await?;

    match lookup.matched_steamid() {
        Some(steamid) => println!("{vanity} -> {steamid}"),
        None => println!(
            "{vanity} not found (success={:?}, message={:?})",
            lookup.success, lookup.message
        ),
    }

    Ok(())
}

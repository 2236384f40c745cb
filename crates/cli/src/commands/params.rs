use auctioneer_core::Params;
use serde::Serialize;

#[derive(Serialize)]
struct ParamsDocument<'a> {
    params: &'a Params,
}

/// Renders params as a `[params]` TOML table, the same shape the config
/// file takes.
pub fn render(params: &Params) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&ParamsDocument { params })
}

use auctioneer_core::{AllowedParams, Params, ParamsError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamChangeVerdict {
    pub permitted: bool,
    pub changed: Vec<&'static str>,
    /// Changed fields the allow-list does not cover.
    pub rejected: Vec<&'static str>,
}

/// Checks a proposed parameter set against the current one. The proposal
/// must be valid on its own before the allow-list is consulted.
pub fn check(
    current: &Params,
    incoming: &Params,
    allowed: &AllowedParams,
) -> Result<ParamChangeVerdict, ParamsError> {
    incoming.validate()?;

    let changes = allowed.changes(current, incoming);
    let rejected = changes
        .iter()
        .filter(|&&(_, permitted)| !permitted)
        .map(|&(name, _)| name)
        .collect::<Vec<_>>();

    Ok(ParamChangeVerdict {
        permitted: rejected.is_empty(),
        changed: changes.into_iter().map(|(name, _)| name).collect(),
        rejected,
    })
}

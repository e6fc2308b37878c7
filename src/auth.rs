use crate::params::ParamMap;

/// Parameter name the API reads the key from
pub const API_KEY_PARAM: &str = "apikey";

/// Pick the token for one call.
///
/// Precedence, highest first: a non-empty key the caller already put into
/// the parameters, the per-call override, the client default. An empty token is
/// passed through untouched; the API decides whether it is valid.
pub fn resolve_token<'a>(
    params: &'a ParamMap,
    call_override: Option<&'a str>,
    client_default: &'a str,
) -> &'a str {
    if let Some(explicit) = params.get(API_KEY_PARAM).filter(|v| !v.is_empty()) {
        return explicit;
    }
    call_override.unwrap_or(client_default)
}

/// Set the resolved token in `params`. A non-empty key already there is kept.
pub fn apply_token(params: &mut ParamMap, call_override: Option<&str>, client_default: &str) {
    let token = resolve_token(params, call_override, client_default).to_string();
    params.insert(API_KEY_PARAM.to_string(), token);
}

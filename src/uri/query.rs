//! Query string parameters.

use log::debug;

use crate::config::QueryConfig;
use crate::multimap::OrderedMultiMap;
use crate::scanner::Scanner;

/// Split a query view into decoded `key=value` pairs.
///
/// Pairs are split on the first raw `=` before anything is decoded, so `%3D`
/// inside a key or value never acts as a delimiter.
pub(crate) fn parameters(query: &Scanner, config: &QueryConfig) -> OrderedMultiMap<String, String> {
    let mut query = query.clone();
    query.move_to_start();
    query
        .split(config.separator)
        .into_iter()
        .map(|piece| pair(piece, config))
        .collect()
}

fn pair(mut piece: Scanner, config: &QueryConfig) -> (String, String) {
    let key = match piece.take_until('=') {
        Ok(key) => key,
        Err(_) => return (decode_key(&piece, config), String::new()),
    };
    let key = decode_key(&key, config);
    // take_until stopped on the '='
    if piece.eat('=') != Ok(true) || piece.at_end() {
        return (key, String::new());
    }

    let value = piece.take_rest();
    match config.decode(value.as_bytes()) {
        Some(decoded) => (key, decoded),
        None => {
            debug!("query value for {key:?} is not valid percent-encoding, keeping {value}");
            (key, value.materialize())
        }
    }
}

fn decode_key(key: &Scanner, config: &QueryConfig) -> String {
    if !config.decode_keys {
        return key.materialize();
    }
    config
        .decode(key.as_bytes())
        .unwrap_or_else(|| key.materialize())
}

//! Building [`TransferDescriptor`]s from what clients send.
//!
//! A transfer can be described by:
//!
//! - a magnet URI (`magnet:?xt=urn:btih:...`),
//! - explicit fields: an info-hash, a display name and trackers, or
//! - the content of a `.torrent` file.
//!
//! Trackers given as a flat list get one tier each.
use std::collections::HashMap;
use std::panic::Location;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use serde_bencode::value::Value;
use sha1::{Digest, Sha1};
use torrenttp_primitives::info_hash::{InfoHash, INFO_HASH_BYTES_LEN, INFO_HASH_HEX_LEN};
use url::Url;

use super::descriptor::TransferDescriptor;
use crate::core::error;

const BTIH_PREFIX: &str = "urn:btih:";

/// Length of the base32 form of an info-hash.
const INFO_HASH_BASE32_LEN: usize = 32;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid magnet link: {reason}, {location}")]
    InvalidMagnet {
        reason: String,
        location: &'static Location<'static>,
    },
    #[error("Invalid torrent file: {reason}, {location}")]
    InvalidTorrentFile {
        reason: String,
        location: &'static Location<'static>,
    },
}

impl From<Error> for error::Error {
    #[track_caller]
    fn from(err: Error) -> Self {
        let message = match err {
            Error::InvalidMagnet { reason, .. } => format!("Invalid magnet link: {reason}"),
            Error::InvalidTorrentFile { reason, .. } => format!("Invalid torrent file: {reason}"),
        };

        error::Error::invalid_argument(&message)
    }
}

#[track_caller]
fn invalid_magnet(reason: &str) -> Error {
    Error::InvalidMagnet {
        reason: reason.to_owned(),
        location: Location::caller(),
    }
}

#[track_caller]
fn invalid_torrent_file(reason: &str) -> Error {
    Error::InvalidTorrentFile {
        reason: reason.to_owned(),
        location: Location::caller(),
    }
}

/// It parses a magnet URI.
///
/// Supported parameters: `xt` (hex or base32 `btih`), `dn`, `tr`, `ws`,
/// `x.pe`, `xs` and `as`.
///
/// # Errors
///
/// Will return `Error::InvalidMagnet` if the URI is not a magnet link or has
/// no valid `btih` exact topic.
pub fn from_magnet(uri: &str) -> Result<TransferDescriptor, Error> {
    let url = Url::parse(uri).map_err(|err| invalid_magnet(&err.to_string()))?;

    if url.scheme() != "magnet" {
        return Err(invalid_magnet("the scheme is not `magnet`"));
    }

    let mut info_hash = None;
    let mut descriptor = TransferDescriptor::new(InfoHash::default());

    for (name, value) in url.query_pairs() {
        let value = value.into_owned();

        match name.as_ref() {
            "xt" => {
                if let Some(encoded) = value.strip_prefix(BTIH_PREFIX) {
                    info_hash = Some(parse_btih(encoded)?);
                }
            }
            "dn" => descriptor.display_name = value,
            "tr" => descriptor.trackers.push(vec![value]),
            "ws" => descriptor.webseeds.push(value),
            "x.pe" => descriptor.peer_addrs.push(value),
            "xs" | "as" => descriptor.sources.push(value),
            _ => {}
        }
    }

    descriptor.info_hash = info_hash.ok_or_else(|| invalid_magnet("missing `xt=urn:btih:` parameter"))?;

    Ok(descriptor)
}

fn parse_btih(encoded: &str) -> Result<InfoHash, Error> {
    match encoded.len() {
        INFO_HASH_HEX_LEN => InfoHash::from_str(encoded).map_err(|err| invalid_magnet(&err.to_string())),
        INFO_HASH_BASE32_LEN => {
            let bytes = decode_base32(encoded).ok_or_else(|| invalid_magnet("invalid base32 info-hash"))?;
            Ok(InfoHash(bytes))
        }
        length => Err(invalid_magnet(&format!("an info-hash can not be {length} characters long"))),
    }
}

/// RFC 4648 base32, without padding, either case.
fn decode_base32(encoded: &str) -> Option<[u8; INFO_HASH_BYTES_LEN]> {
    let decoded = BASE32_NOPAD.decode(encoded.to_ascii_uppercase().as_bytes()).ok()?;

    decoded.try_into().ok()
}

/// It builds a descriptor from explicit fields.
///
/// # Errors
///
/// Will return `Error::InvalidInfoHash` if `info_hash` is not 40 hexadecimal
/// characters.
pub fn from_parts(info_hash: &str, display_name: &str, trackers: &[String]) -> Result<TransferDescriptor, error::Error> {
    let parsed = InfoHash::from_str(info_hash).map_err(|err| error::Error::invalid_info_hash(info_hash, err))?;

    let mut descriptor = TransferDescriptor::new(parsed);
    display_name.clone_into(&mut descriptor.display_name);
    descriptor.trackers = trackers.iter().map(|tracker| vec![tracker.clone()]).collect();

    Ok(descriptor)
}

/// It builds a descriptor from the content of a `.torrent` file. The
/// info-hash is the SHA-1 of the bencoded `info` dictionary.
///
/// # Errors
///
/// Will return `Error::InvalidTorrentFile` if the content is not a bencoded
/// dictionary with an `info` dictionary.
pub fn from_torrent_file(content: &[u8]) -> Result<TransferDescriptor, Error> {
    let root: Value = serde_bencode::from_bytes(content).map_err(|err| invalid_torrent_file(&err.to_string()))?;

    let Value::Dict(root) = root else {
        return Err(invalid_torrent_file("the content is not a dictionary"));
    };

    let info = root.get(b"info".as_slice()).ok_or_else(|| invalid_torrent_file("missing `info` dictionary"))?;

    let Value::Dict(info_dict) = info else {
        return Err(invalid_torrent_file("`info` is not a dictionary"));
    };

    let encoded_info = serde_bencode::to_bytes(info).map_err(|err| invalid_torrent_file(&err.to_string()))?;
    let digest = Sha1::digest(&encoded_info);

    let info_hash = InfoHash::try_from(digest.to_vec()).map_err(|err| invalid_torrent_file(&err.to_string()))?;

    let mut descriptor = TransferDescriptor::new(info_hash);

    if let Some(name) = string(info_dict, "name") {
        descriptor.display_name = name;
    }

    match root.get(b"announce-list".as_slice()) {
        Some(Value::List(tiers)) => {
            descriptor.trackers = tiers
                .iter()
                .filter_map(|tier| match tier {
                    Value::List(urls) => Some(urls.iter().filter_map(as_string).collect::<Vec<_>>()),
                    _ => None,
                })
                .filter(|tier| !tier.is_empty())
                .collect();
        }
        _ => {
            if let Some(announce) = string(&root, "announce") {
                descriptor.trackers = vec![vec![announce]];
            }
        }
    }

    match root.get(b"url-list".as_slice()) {
        Some(Value::List(urls)) => descriptor.webseeds = urls.iter().filter_map(as_string).collect(),
        Some(url) => descriptor.webseeds.extend(as_string(url)),
        None => {}
    }

    if let Some(Value::List(nodes)) = root.get(b"nodes".as_slice()) {
        descriptor.dht_nodes = nodes
            .iter()
            .filter_map(|node| match node {
                Value::List(pair) => match pair.as_slice() {
                    [Value::Bytes(host), Value::Int(port)] => Some(format!("{}:{port}", String::from_utf8_lossy(host))),
                    _ => None,
                },
                _ => None,
            })
            .collect();
    }

    Ok(descriptor)
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn string(dict: &HashMap<Vec<u8>, Value>, key: &str) -> Option<String> {
    dict.get(key.as_bytes()).and_then(as_string)
}

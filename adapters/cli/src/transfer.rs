#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use vanguard_world::{MapData, PlainMap};

const TRANSFER_DOMAIN: &str = "vanguard";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded save payload.
pub(crate) const TRANSFER_HEADER: &str = "vanguard:v1";
/// Delimiter used to separate the prefix, map dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Single-line save string carrying a full map snapshot.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SaveTransfer {
    /// The snapshot carried by the transfer string.
    pub map: PlainMap,
}

impl SaveTransfer {
    /// Encodes the save into a single-line string suitable for clipboard
    /// transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let json = serde_json::to_vec(&self.map).expect("save snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!(
            "{TRANSFER_HEADER}:{}x{}:{encoded}",
            self.map.size.width(),
            self.map.size.height(),
        )
    }

    /// Decodes a save from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, SaveTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SaveTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(SaveTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(SaveTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(SaveTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(SaveTransferError::MissingPayload)?;

        if domain != TRANSFER_DOMAIN {
            return Err(SaveTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != TRANSFER_VERSION {
            return Err(SaveTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(SaveTransferError::InvalidEncoding)?;
        let map: PlainMap =
            serde_json::from_slice(&bytes).map_err(SaveTransferError::InvalidPayload)?;
        if map.size.width() != columns || map.size.height() != rows {
            return Err(SaveTransferError::DimensionMismatch);
        }
        // Reject payloads the engine itself would refuse to load.
        if let Err(error) = MapData::from_plain(&map) {
            return Err(SaveTransferError::InvalidMap(error.to_string()));
        }

        Ok(Self { map })
    }
}

/// Errors that can occur while decoding save transfer strings.
#[derive(Debug)]
pub(crate) enum SaveTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded save.
    MissingPrefix,
    /// The encoded save did not contain a version segment.
    MissingVersion,
    /// The encoded save did not include map dimensions.
    MissingDimensions,
    /// The encoded save did not include the payload segment.
    MissingPayload,
    /// The encoded save used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded save used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The map dimensions could not be parsed from the encoded save.
    InvalidDimensions(String),
    /// The dimensions segment disagreed with the embedded snapshot.
    DimensionMismatch,
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The decoded snapshot failed engine validation.
    InvalidMap(String),
}

impl fmt::Display for SaveTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "save payload was empty"),
            Self::MissingPrefix => write!(f, "save string is missing the prefix"),
            Self::MissingVersion => write!(f, "save string is missing the version"),
            Self::MissingDimensions => write!(f, "save string is missing the map dimensions"),
            Self::MissingPayload => write!(f, "save string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "save prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "save version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse map dimensions '{dimensions}'")
            }
            Self::DimensionMismatch => {
                write!(f, "save dimensions disagree with the embedded map")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode save payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse save payload: {error}")
            }
            Self::InvalidMap(error) => write!(f, "embedded map is invalid: {error}"),
        }
    }
}

impl Error for SaveTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(i32, i32), SaveTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| SaveTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<i32>()
        .map_err(|_| SaveTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<i32>()
        .map_err(|_| SaveTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns < 1 || rows < 1 {
        return Err(SaveTransferError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanguard_core::{PlayerId, SizeVector, TeamId, PLAINS};
    use vanguard_world::{MapConfig, MapData, Player, PlayerControl, Team};

    fn sample_map() -> MapData {
        MapData::create(
            SizeVector::new(6, 4),
            vec![PLAINS; 24],
            Vec::new(),
            Vec::new(),
            vec![Team::new(TeamId::new(1), vec![PlayerId::new(1)])],
            vec![Player::new(
                PlayerId::new(1),
                TeamId::new(1),
                100,
                PlayerControl::Human {
                    user: "a".to_owned(),
                },
            )],
            MapConfig::default(),
            PlayerId::new(1),
            1,
        )
        .expect("valid map")
    }

    #[test]
    fn round_trip_preserves_the_snapshot() {
        let transfer = SaveTransfer {
            map: sample_map().to_plain(),
        };
        let encoded = transfer.encode();
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:6x4:")));

        let decoded = SaveTransfer::decode(&encoded).expect("save decodes");
        assert_eq!(transfer, decoded);
    }

    #[test]
    fn foreign_prefixes_are_rejected() {
        let encoded = SaveTransfer {
            map: sample_map().to_plain(),
        }
        .encode();
        let tampered = encoded.replacen("vanguard", "other", 1);
        assert!(matches!(
            SaveTransfer::decode(&tampered),
            Err(SaveTransferError::InvalidPrefix(_)),
        ));
    }

    #[test]
    fn garbage_payloads_are_rejected() {
        assert!(matches!(
            SaveTransfer::decode(""),
            Err(SaveTransferError::EmptyPayload),
        ));
        assert!(matches!(
            SaveTransfer::decode("vanguard:v1:6x4:!!!"),
            Err(SaveTransferError::InvalidEncoding(_)),
        ));
        assert!(matches!(
            SaveTransfer::decode("vanguard:v2:6x4:AAAA"),
            Err(SaveTransferError::UnsupportedVersion(_)),
        ));
    }
}

//! Receipt log scanning.

use alloy::dyn_abi::{DecodedEvent, DynSolValue, EventExt};
use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::{Log, U256};

/// Find the identifier emitted by `event_name` in a receipt's logs.
///
/// Logs are tried in order against every overload of `event_name` in
/// `interface`. Logs that do not decode (other contracts, other events,
/// malformed data) are skipped. The first decoded log whose first argument
/// is an unsigned integer yields the identifier; `None` means no log did.
pub fn resolve_identifier(logs: &[Log], interface: &JsonAbi, event_name: &str) -> Option<U256> {
    let events = interface.events.get(event_name)?;

    logs.iter().enumerate().find_map(|(index, log)| {
        events.iter().find_map(|event| {
            if !event.anonymous && log.data.topics().first() != Some(&event.selector()) {
                return None;
            }
            let decoded = event.decode_log(&log.data).ok()?;
            let id = first_argument(event, decoded);
            if id.is_none() {
                tracing::debug!(log_index = index, event = event_name, "Event has no integer first argument");
            }
            id
        })
    })
}

fn first_argument(event: &Event, decoded: DecodedEvent) -> Option<U256> {
    let first = event.inputs.first()?;
    let value = if first.indexed {
        decoded.indexed.into_iter().next()?
    } else {
        decoded.body.into_iter().next()?
    };

    match value {
        DynSolValue::Uint(id, _) => Some(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::contract::{default_interface, PropertyRegistry};
    use alloy::primitives::{Address, Bytes, LogData, B256};
    use alloy::sol;
    use alloy::sol_types::SolEvent;

    sol! {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event PropertyMinted(uint256 tokenId, address indexed owner);
    }

    fn created_log(id: u64) -> Log {
        let event = PropertyRegistry::PropertyCreated {
            propertyId: U256::from(id),
            owner: Address::repeat_byte(0x11),
            totalShares: U256::from(100),
        };
        Log {
            address: Address::repeat_byte(0x22),
            data: event.encode_log_data(),
        }
    }

    fn transfer_log() -> Log {
        let event = Transfer {
            from: Address::ZERO,
            to: Address::repeat_byte(0x33),
            value: U256::from(7),
        };
        Log {
            address: Address::repeat_byte(0x44),
            data: event.encode_log_data(),
        }
    }

    fn garbage_log() -> Log {
        Log {
            address: Address::repeat_byte(0x55),
            data: LogData::new_unchecked(vec![B256::repeat_byte(0x99)], Bytes::from(vec![1, 2, 3])),
        }
    }

    #[test]
    fn test_single_created_log() {
        let abi = default_interface().unwrap();
        let id = resolve_identifier(&[created_log(42)], &abi, "PropertyCreated");
        assert_eq!(id, Some(U256::from(42)));
    }

    #[test]
    fn test_no_matching_log() {
        let abi = default_interface().unwrap();
        assert_eq!(resolve_identifier(&[], &abi, "PropertyCreated"), None);
        assert_eq!(
            resolve_identifier(&[transfer_log(), garbage_log()], &abi, "PropertyCreated"),
            None
        );
    }

    #[test]
    fn test_unrelated_logs_are_skipped() {
        let abi = default_interface().unwrap();
        let logs = vec![garbage_log(), transfer_log(), created_log(9), created_log(10)];
        assert_eq!(resolve_identifier(&logs, &abi, "PropertyCreated"), Some(U256::from(9)));
    }

    #[test]
    fn test_truncated_event_data_is_skipped() {
        let abi = default_interface().unwrap();
        let mut broken = created_log(1);
        let topics = broken.data.topics().to_vec();
        broken.data = LogData::new_unchecked(topics, Bytes::from(vec![0u8; 4]));

        let logs = vec![broken, created_log(2)];
        assert_eq!(resolve_identifier(&logs, &abi, "PropertyCreated"), Some(U256::from(2)));
    }

    #[test]
    fn test_unknown_event_name() {
        let abi = default_interface().unwrap();
        assert_eq!(resolve_identifier(&[created_log(42)], &abi, "PropertyListed"), None);
    }

    #[test]
    fn test_non_indexed_first_argument() {
        let abi = JsonAbi::parse(["event PropertyMinted(uint256 tokenId, address indexed owner)"]).unwrap();
        let log = Log {
            address: Address::ZERO,
            data: PropertyMinted {
                tokenId: U256::from(77),
                owner: Address::repeat_byte(0x01),
            }
            .encode_log_data(),
        };
        assert_eq!(resolve_identifier(&[log], &abi, "PropertyMinted"), Some(U256::from(77)));
    }
}

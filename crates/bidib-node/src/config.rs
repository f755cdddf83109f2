use bidib_wire::types::{CLASS_ACCESSORY, CLASS_BOOSTER, CLASS_DCC_MAIN};
use bidib_wire::{SoftwareVersion, UniqueId};

/// Identity and initial state of the emulated node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// This node's own unique id (first node-table entry).
    pub unique_id: UniqueId,
    /// Further node-table entries announced on enumeration.
    pub subnodes: Vec<UniqueId>,
    /// Reported by `SYS_GET_SW_VERSION`.
    pub software_version: SoftwareVersion,
    /// Initial booster track voltage in volts.
    pub booster_voltage: u8,
    /// Namespace-0 string 0.
    pub product_name: String,
    /// Namespace-0 string 1.
    pub user_name: String,
}

/// The crate version, as reported by `SYS_GET_SW_VERSION`.
fn crate_version() -> SoftwareVersion {
    let mut parts = env!("CARGO_PKG_VERSION")
        .split('.')
        .map(|part| part.parse::<u8>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    let patch = parts.next().unwrap_or(0);
    SoftwareVersion {
        patch,
        minor,
        major,
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            unique_id: UniqueId::new(
                CLASS_BOOSTER | CLASS_ACCESSORY | CLASS_DCC_MAIN,
                0x0d,
                0xdead_beef,
            ),
            subnodes: vec![UniqueId::new(CLASS_ACCESSORY, 0x0d, 0xcafe_babe)],
            software_version: crate_version(),
            booster_voltage: 12,
            product_name: "bidibd".to_string(),
            user_name: "Teststellwerk".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity_is_a_booster_and_accessory() {
        let config = NodeConfig::default();
        assert!(config.unique_id.has_class(CLASS_BOOSTER));
        assert!(config.unique_id.has_class(CLASS_ACCESSORY));
        assert_eq!(config.subnodes.len(), 1);
    }

    #[test]
    fn software_version_tracks_the_crate_version() {
        let v = NodeConfig::default().software_version;
        assert_eq!(
            format!("{}.{}.{}", v.major, v.minor, v.patch),
            env!("CARGO_PKG_VERSION")
        );
    }
}

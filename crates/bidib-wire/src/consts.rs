//! Protocol constants transcribed from the published BiDiB reference.
//!
//! Message type codes, feature ids and state values are opaque domain
//! data; nothing here is derived, only copied.

/// Magic answered to `SYS_GET_MAGIC`.
pub const SYS_MAGIC: u16 = 0xaffe;

/// Protocol version answered to `SYS_GET_P_VERSION` (minor in the low
/// byte, major in the high byte).
pub const PROTOCOL_VERSION: u16 = 0x0008;

// -- downstream message types ------------------------------------------------

pub const MSG_SYS_GET_MAGIC: u8 = 0x01;
pub const MSG_SYS_GET_P_VERSION: u8 = 0x02;
pub const MSG_SYS_ENABLE: u8 = 0x03;
pub const MSG_SYS_DISABLE: u8 = 0x04;
pub const MSG_SYS_GET_UNIQUE_ID: u8 = 0x05;
pub const MSG_SYS_GET_SW_VERSION: u8 = 0x06;
pub const MSG_SYS_PING: u8 = 0x07;
pub const MSG_SYS_IDENTIFY: u8 = 0x08;
pub const MSG_SYS_RESET: u8 = 0x09;
pub const MSG_GET_PKT_CAPACITY: u8 = 0x0a;
pub const MSG_NODETAB_GETALL: u8 = 0x0b;
pub const MSG_NODETAB_GETNEXT: u8 = 0x0c;
pub const MSG_NODE_CHANGED_ACK: u8 = 0x0d;
pub const MSG_SYS_GET_ERROR: u8 = 0x0e;
pub const MSG_SYS_CLOCK: u8 = 0x0f;

pub const MSG_FEATURE_GETALL: u8 = 0x10;
pub const MSG_FEATURE_GETNEXT: u8 = 0x11;
pub const MSG_FEATURE_GET: u8 = 0x12;
pub const MSG_FEATURE_SET: u8 = 0x13;
pub const MSG_VENDOR_ENABLE: u8 = 0x14;
pub const MSG_VENDOR_DISABLE: u8 = 0x15;
pub const MSG_VENDOR_SET: u8 = 0x16;
pub const MSG_VENDOR_GET: u8 = 0x17;
pub const MSG_STRING_GET: u8 = 0x18;
pub const MSG_STRING_SET: u8 = 0x19;

pub const MSG_BOOST_OFF: u8 = 0x30;
pub const MSG_BOOST_ON: u8 = 0x31;
pub const MSG_BOOST_QUERY: u8 = 0x32;

pub const MSG_ACCESSORY_SET: u8 = 0x38;
pub const MSG_ACCESSORY_GET: u8 = 0x39;
pub const MSG_ACCESSORY_PARA_SET: u8 = 0x3a;
pub const MSG_ACCESSORY_PARA_GET: u8 = 0x3b;
pub const MSG_ACCESSORY_GETALL: u8 = 0x3c;

pub const MSG_LC_PORT_QUERY_ALL: u8 = 0x3f;
pub const MSG_LC_OUTPUT: u8 = 0x40;
pub const MSG_LC_CONFIG_SET: u8 = 0x41;
pub const MSG_LC_CONFIG_GET: u8 = 0x42;
pub const MSG_LC_KEY_QUERY: u8 = 0x43;
pub const MSG_LC_CONFIGX_GET_ALL: u8 = 0x44;
pub const MSG_LC_CONFIGX_SET: u8 = 0x45;
pub const MSG_LC_CONFIGX_GET: u8 = 0x46;

pub const MSG_CS_ALLOCATE: u8 = 0x60;
pub const MSG_CS_SET_STATE: u8 = 0x62;
pub const MSG_CS_DRIVE: u8 = 0x64;
pub const MSG_CS_ACCESSORY: u8 = 0x65;
pub const MSG_CS_BIN_STATE: u8 = 0x66;
pub const MSG_CS_POM: u8 = 0x67;

// -- upstream message types --------------------------------------------------

pub const MSG_SYS_MAGIC: u8 = 0x81;
pub const MSG_SYS_PONG: u8 = 0x82;
pub const MSG_SYS_P_VERSION: u8 = 0x83;
pub const MSG_SYS_UNIQUE_ID: u8 = 0x84;
pub const MSG_SYS_SW_VERSION: u8 = 0x85;
pub const MSG_SYS_ERROR: u8 = 0x86;
pub const MSG_SYS_IDENTIFY_STATE: u8 = 0x87;
pub const MSG_NODETAB_COUNT: u8 = 0x88;
pub const MSG_NODETAB: u8 = 0x89;
pub const MSG_PKT_CAPACITY: u8 = 0x8a;
pub const MSG_NODE_NA: u8 = 0x8b;
pub const MSG_NODE_LOST: u8 = 0x8c;
pub const MSG_NODE_NEW: u8 = 0x8d;
pub const MSG_STALL: u8 = 0x8e;

pub const MSG_FEATURE: u8 = 0x90;
pub const MSG_FEATURE_NA: u8 = 0x91;
pub const MSG_FEATURE_COUNT: u8 = 0x92;
pub const MSG_VENDOR: u8 = 0x93;
pub const MSG_VENDOR_ACK: u8 = 0x94;
pub const MSG_STRING: u8 = 0x95;

pub const MSG_BOOST_STAT: u8 = 0xb0;
pub const MSG_BOOST_DIAGNOSTIC: u8 = 0xb2;

pub const MSG_ACCESSORY_STATE: u8 = 0xb8;
pub const MSG_ACCESSORY_PARA: u8 = 0xb9;
pub const MSG_ACCESSORY_NOTIFY: u8 = 0xba;

pub const MSG_LC_STAT: u8 = 0xc0;
pub const MSG_LC_NA: u8 = 0xc1;
pub const MSG_LC_CONFIG: u8 = 0xc2;
pub const MSG_LC_KEY: u8 = 0xc3;
pub const MSG_LC_WAIT: u8 = 0xc4;
pub const MSG_LC_CONFIGX: u8 = 0xc6;

pub const MSG_CS_ALLOC_ACK: u8 = 0xe0;
pub const MSG_CS_STATE: u8 = 0xe1;
pub const MSG_CS_DRIVE_ACK: u8 = 0xe2;
pub const MSG_CS_ACCESSORY_ACK: u8 = 0xe3;
pub const MSG_CS_POM_ACK: u8 = 0xe4;
pub const MSG_CS_DRIVE_MANUAL: u8 = 0xe5;
pub const MSG_CS_ACCESSORY_MANUAL: u8 = 0xe6;

// -- feature ids -------------------------------------------------------------

pub const FEATURE_BST_VOLT_ADJUSTABLE: u8 = 1;
pub const FEATURE_BST_VOLT: u8 = 2;
pub const FEATURE_BST_CUTOUT_AVAILABLE: u8 = 3;
pub const FEATURE_BST_CUTOUT_ON: u8 = 4;
pub const FEATURE_BST_TURNOFF_TIME: u8 = 5;
pub const FEATURE_BST_INRUSH_TURNOFF_TIME: u8 = 6;
pub const FEATURE_BST_AMPERE_ADJUSTABLE: u8 = 7;
pub const FEATURE_BST_AMPERE: u8 = 8;
pub const FEATURE_BST_CURMEAS_INTERVAL: u8 = 9;
pub const FEATURE_BST_INHIBIT_AUTOSTART: u8 = 12;
pub const FEATURE_BST_INHIBIT_LOCAL_ONOFF: u8 = 13;

pub const FEATURE_ACCESSORY_COUNT: u8 = 40;
pub const FEATURE_ACCESSORY_SURVEILLED: u8 = 41;

pub const FEATURE_CTRL_INPUT_COUNT: u8 = 50;
pub const FEATURE_CTRL_SWITCH_COUNT: u8 = 52;
pub const FEATURE_CTRL_LIGHT_COUNT: u8 = 53;
pub const FEATURE_CTRL_SERVO_COUNT: u8 = 54;

pub const FEATURE_GEN_SPYMODE: u8 = 100;
pub const FEATURE_GEN_WATCHDOG: u8 = 101;

pub const FEATURE_STRING_NAMESPACES_AVAILABLE: u8 = 251;
pub const FEATURE_STRING_SIZE: u8 = 252;
pub const FEATURE_RELEVANT_PID_BITS: u8 = 253;
pub const FEATURE_FW_UPDATE_MODE: u8 = 254;

// -- state values ------------------------------------------------------------

pub const BST_STATE_OFF: u8 = 0x00;
pub const BST_STATE_OFF_SHORT: u8 = 0x01;
pub const BST_STATE_OFF_HOT: u8 = 0x02;
pub const BST_STATE_OFF_NOPOWER: u8 = 0x03;
pub const BST_STATE_ON: u8 = 0x80;
pub const BST_STATE_ON_LIMIT: u8 = 0x81;
pub const BST_STATE_ON_HOT: u8 = 0x82;

pub const BST_DIAG_I: u8 = 0x00;
pub const BST_DIAG_V: u8 = 0x01;
pub const BST_DIAG_TEMP: u8 = 0x02;

pub const CS_STATE_OFF: u8 = 0x00;
pub const CS_STATE_STOP: u8 = 0x01;
pub const CS_STATE_SOFTSTOP: u8 = 0x02;
pub const CS_STATE_GO: u8 = 0x03;
pub const CS_STATE_PROG: u8 = 0x08;
pub const CS_STATE_BUSY: u8 = 0x0d;
pub const CS_STATE_QUERY: u8 = 0xff;

pub const PORTTYPE_SWITCH: u8 = 0;
pub const PORTTYPE_LIGHT: u8 = 1;
pub const PORTTYPE_SERVO: u8 = 2;
pub const PORTTYPE_SOUND: u8 = 3;
pub const PORTTYPE_MOTOR: u8 = 4;
pub const PORTTYPE_INPUT: u8 = 15;

pub const PCFG_SERVO_ADJ_L: u8 = 0x07;
pub const PCFG_SERVO_ADJ_H: u8 = 0x08;
pub const PCFG_SERVO_SPEED: u8 = 0x09;

pub const ACCESSORY_PARA_NOTEXIST: u8 = 255;

/// Human-readable name of a message type, for log lines.
pub fn message_name(ty: u8) -> String {
    let name = match ty {
        MSG_SYS_GET_MAGIC => "SYS_GET_MAGIC",
        MSG_SYS_GET_P_VERSION => "SYS_GET_P_VERSION",
        MSG_SYS_ENABLE => "SYS_ENABLE",
        MSG_SYS_DISABLE => "SYS_DISABLE",
        MSG_SYS_GET_UNIQUE_ID => "SYS_GET_UNIQUE_ID",
        MSG_SYS_GET_SW_VERSION => "SYS_GET_SW_VERSION",
        MSG_SYS_PING => "SYS_PING",
        MSG_SYS_IDENTIFY => "SYS_IDENTIFY",
        MSG_SYS_RESET => "SYS_RESET",
        MSG_GET_PKT_CAPACITY => "GET_PKT_CAPACITY",
        MSG_NODETAB_GETALL => "NODETAB_GETALL",
        MSG_NODETAB_GETNEXT => "NODETAB_GETNEXT",
        MSG_NODE_CHANGED_ACK => "NODE_CHANGED_ACK",
        MSG_SYS_GET_ERROR => "SYS_GET_ERROR",
        MSG_SYS_CLOCK => "SYS_CLOCK",
        MSG_FEATURE_GETALL => "FEATURE_GETALL",
        MSG_FEATURE_GETNEXT => "FEATURE_GETNEXT",
        MSG_FEATURE_GET => "FEATURE_GET",
        MSG_FEATURE_SET => "FEATURE_SET",
        MSG_VENDOR_ENABLE => "VENDOR_ENABLE",
        MSG_VENDOR_DISABLE => "VENDOR_DISABLE",
        MSG_VENDOR_SET => "VENDOR_SET",
        MSG_VENDOR_GET => "VENDOR_GET",
        MSG_STRING_GET => "STRING_GET",
        MSG_STRING_SET => "STRING_SET",
        MSG_BOOST_OFF => "BOOST_OFF",
        MSG_BOOST_ON => "BOOST_ON",
        MSG_BOOST_QUERY => "BOOST_QUERY",
        MSG_ACCESSORY_SET => "ACCESSORY_SET",
        MSG_ACCESSORY_GET => "ACCESSORY_GET",
        MSG_ACCESSORY_PARA_SET => "ACCESSORY_PARA_SET",
        MSG_ACCESSORY_PARA_GET => "ACCESSORY_PARA_GET",
        MSG_ACCESSORY_GETALL => "ACCESSORY_GETALL",
        MSG_LC_PORT_QUERY_ALL => "LC_PORT_QUERY_ALL",
        MSG_LC_OUTPUT => "LC_OUTPUT",
        MSG_LC_CONFIG_SET => "LC_CONFIG_SET",
        MSG_LC_CONFIG_GET => "LC_CONFIG_GET",
        MSG_LC_KEY_QUERY => "LC_KEY_QUERY",
        MSG_LC_CONFIGX_GET_ALL => "LC_CONFIGX_GET_ALL",
        MSG_LC_CONFIGX_SET => "LC_CONFIGX_SET",
        MSG_LC_CONFIGX_GET => "LC_CONFIGX_GET",
        MSG_CS_ALLOCATE => "CS_ALLOCATE",
        MSG_CS_SET_STATE => "CS_SET_STATE",
        MSG_CS_DRIVE => "CS_DRIVE",
        MSG_CS_ACCESSORY => "CS_ACCESSORY",
        MSG_CS_BIN_STATE => "CS_BIN_STATE",
        MSG_CS_POM => "CS_POM",
        MSG_SYS_MAGIC => "SYS_MAGIC",
        MSG_SYS_PONG => "SYS_PONG",
        MSG_SYS_P_VERSION => "SYS_P_VERSION",
        MSG_SYS_UNIQUE_ID => "SYS_UNIQUE_ID",
        MSG_SYS_SW_VERSION => "SYS_SW_VERSION",
        MSG_SYS_ERROR => "SYS_ERROR",
        MSG_SYS_IDENTIFY_STATE => "SYS_IDENTIFY_STATE",
        MSG_NODETAB_COUNT => "NODETAB_COUNT",
        MSG_NODETAB => "NODETAB",
        MSG_PKT_CAPACITY => "PKT_CAPACITY",
        MSG_NODE_NA => "NODE_NA",
        MSG_NODE_LOST => "NODE_LOST",
        MSG_NODE_NEW => "NODE_NEW",
        MSG_STALL => "STALL",
        MSG_FEATURE => "FEATURE",
        MSG_FEATURE_NA => "FEATURE_NA",
        MSG_FEATURE_COUNT => "FEATURE_COUNT",
        MSG_VENDOR => "VENDOR",
        MSG_VENDOR_ACK => "VENDOR_ACK",
        MSG_STRING => "STRING",
        MSG_BOOST_STAT => "BOOST_STAT",
        MSG_BOOST_DIAGNOSTIC => "BOOST_DIAGNOSTIC",
        MSG_ACCESSORY_STATE => "ACCESSORY_STATE",
        MSG_ACCESSORY_PARA => "ACCESSORY_PARA",
        MSG_ACCESSORY_NOTIFY => "ACCESSORY_NOTIFY",
        MSG_LC_STAT => "LC_STAT",
        MSG_LC_NA => "LC_NA",
        MSG_LC_CONFIG => "LC_CONFIG",
        MSG_LC_KEY => "LC_KEY",
        MSG_LC_WAIT => "LC_WAIT",
        MSG_LC_CONFIGX => "LC_CONFIGX",
        MSG_CS_ALLOC_ACK => "CS_ALLOC_ACK",
        MSG_CS_STATE => "CS_STATE",
        MSG_CS_DRIVE_ACK => "CS_DRIVE_ACK",
        MSG_CS_ACCESSORY_ACK => "CS_ACCESSORY_ACK",
        MSG_CS_POM_ACK => "CS_POM_ACK",
        MSG_CS_DRIVE_MANUAL => "CS_DRIVE_MANUAL",
        MSG_CS_ACCESSORY_MANUAL => "CS_ACCESSORY_MANUAL",
        _ => return format!("{ty}"),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_have_names() {
        assert_eq!(message_name(MSG_SYS_GET_MAGIC), "SYS_GET_MAGIC");
        assert_eq!(message_name(MSG_NODE_NA), "NODE_NA");
    }

    #[test]
    fn unknown_types_print_their_number() {
        assert_eq!(message_name(0x7e), "126");
    }
}

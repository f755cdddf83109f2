use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use bidib_wire::consts::*;
use bidib_wire::pack::latin1_from_str;
use bidib_wire::{CsDrive, KeyValue, Message, MessageRecord, Time, UniqueId};

use crate::config::NodeConfig;
use crate::handler::{typed_handler, Enumeration, Handler};

const ACCESSORY_SWITCH_TIME: Duration = Duration::from_secs(1);

/// The node engine.
///
/// All state is owned here and touched only from the driving loop; a
/// handler runs to completion, and every reply it queues is flushed
/// before the next inbound record is dispatched. That ordering is what
/// makes the `_GETALL`/`_GETNEXT` handler swaps safe without locks.
pub struct Node {
    handlers: Vec<Handler>,
    nodes: Vec<UniqueId>,
    node_tab_version: u8,
    features: BTreeMap<u8, u8>,
    strings: BTreeMap<u16, String>,
    booster_state: u8,
    booster_voltage: u8,
    cs_state: u8,
    out: Vec<Message>,
    now: Instant,
    diag_interval: Duration,
    diag_next: Option<Instant>,
    followups: Vec<(Instant, Message)>,
}

fn node_na() -> Message {
    Message::with(MSG_NODE_NA, (0xffu8,))
}

fn feature_na() -> Message {
    Message::with(MSG_FEATURE_NA, (0xffu8,))
}

impl Node {
    pub fn new(config: NodeConfig) -> Self {
        let diag_interval = Duration::from_millis(1000);

        let mut features = BTreeMap::new();
        features.insert(FEATURE_BST_VOLT_ADJUSTABLE, 1);
        features.insert(FEATURE_BST_VOLT, config.booster_voltage);
        features.insert(FEATURE_BST_CUTOUT_AVAILABLE, 1);
        features.insert(FEATURE_BST_CUTOUT_ON, 1);
        features.insert(FEATURE_BST_AMPERE, 147);
        features.insert(
            FEATURE_BST_CURMEAS_INTERVAL,
            (diag_interval.as_millis() / 10) as u8,
        );
        features.insert(FEATURE_BST_INHIBIT_AUTOSTART, 0);
        features.insert(FEATURE_ACCESSORY_COUNT, 16);
        features.insert(FEATURE_CTRL_SERVO_COUNT, 16);
        features.insert(FEATURE_GEN_WATCHDOG, 10);
        features.insert(FEATURE_STRING_NAMESPACES_AVAILABLE, 0b101);
        features.insert(FEATURE_STRING_SIZE, 24);
        features.insert(FEATURE_FW_UPDATE_MODE, 0);

        let mut strings = BTreeMap::new();
        strings.insert(0x0000, config.product_name.clone());
        strings.insert(0x0001, config.user_name.clone());

        let mut nodes = vec![config.unique_id];
        nodes.extend_from_slice(&config.subnodes);

        let mut node = Self {
            handlers: std::iter::repeat_with(|| Handler::None).take(256).collect(),
            nodes,
            node_tab_version: 1,
            features,
            strings,
            booster_state: BST_STATE_OFF,
            booster_voltage: config.booster_voltage,
            cs_state: CS_STATE_OFF,
            out: Vec::new(),
            now: Instant::now(),
            diag_interval,
            diag_next: None,
            followups: Vec::new(),
        };

        node.install_static(MSG_SYS_GET_MAGIC, Message::with(MSG_SYS_MAGIC, (SYS_MAGIC,)));
        node.install_static(
            MSG_SYS_GET_P_VERSION,
            Message::with(MSG_SYS_P_VERSION, (PROTOCOL_VERSION,)),
        );
        node.install_static(
            MSG_SYS_GET_SW_VERSION,
            Message::with(MSG_SYS_SW_VERSION, (config.software_version,)),
        );
        node.install_static(
            MSG_SYS_GET_UNIQUE_ID,
            Message::with(MSG_SYS_UNIQUE_ID, (config.unique_id,)),
        );
        node.install_static(MSG_NODETAB_GETNEXT, node_na());
        node.install_static(MSG_FEATURE_GETNEXT, feature_na());

        node.install(
            MSG_SYS_ENABLE,
            typed_handler!(|_node| info!("system enabled")),
        );
        node.install(
            MSG_SYS_DISABLE,
            typed_handler!(|_node| info!("system disabled")),
        );
        node.install(
            MSG_SYS_CLOCK,
            typed_handler!(|node, time: Time| node.sys_clock(time)),
        );
        node.install(
            MSG_NODETAB_GETALL,
            typed_handler!(|node| node.nodetab_getall()),
        );
        node.install(
            MSG_FEATURE_GETALL,
            typed_handler!(|node, stream: Option<u8>| node.feature_getall(stream)),
        );
        node.install(
            MSG_FEATURE_GET,
            typed_handler!(|node, id: u8| node.feature_get(id)),
        );
        node.install(
            MSG_FEATURE_SET,
            typed_handler!(|node, id: u8, value: u8| node.feature_set(id, value)),
        );
        node.install(
            MSG_BOOST_QUERY,
            typed_handler!(|node| node.boost_query()),
        );
        node.install(
            MSG_BOOST_ON,
            typed_handler!(|node, local: u8| node.boost_on(local)),
        );
        node.install(
            MSG_BOOST_OFF,
            typed_handler!(|node, local: u8| node.boost_off(local)),
        );
        node.install(
            MSG_CS_SET_STATE,
            typed_handler!(|node, state: u8| node.cs_set_state(state)),
        );
        node.install(
            MSG_CS_DRIVE,
            typed_handler!(|node, drive: CsDrive| node.cs_drive(drive)),
        );
        node.install(
            MSG_ACCESSORY_GET,
            typed_handler!(|node, num: u8| node.accessory_get(num)),
        );
        node.install(
            MSG_ACCESSORY_SET,
            typed_handler!(|node, num: u8, aspect: u8| node.accessory_set(num, aspect)),
        );
        node.install(
            MSG_ACCESSORY_PARA_GET,
            typed_handler!(|node, anum: u8, pnum: u8| node.accessory_para_get(anum, pnum)),
        );
        node.install(
            MSG_LC_PORT_QUERY_ALL,
            typed_handler!(
                |node, select: Option<u16>, start: Option<u16>, end: Option<u16>| {
                    node.lc_port_query_all(select, start, end)
                }
            ),
        );
        node.install(
            MSG_LC_CONFIGX_GET_ALL,
            typed_handler!(|node, start: Option<u16>, end: Option<u16>| {
                node.lc_configx_get_all(start, end)
            }),
        );
        node.install(
            MSG_STRING_GET,
            typed_handler!(|node, ns: u8, id: u8| node.string_get(ns, id)),
        );
        node.install(
            MSG_STRING_SET,
            typed_handler!(|node, ns: u8, id: u8, value: String| node.string_set(ns, id, value)),
        );

        node
    }

    /// Dispatch one inbound record.
    pub fn handle_record(&mut self, record: &MessageRecord, now: Instant) {
        self.now = now;
        debug!(record = %record, "RECV");

        let idx = usize::from(record.message.ty());
        match std::mem::take(&mut self.handlers[idx]) {
            Handler::None => {
                debug!(ty = %bidib_wire::message_name(record.message.ty()), "message not handled");
            }
            Handler::Static(reply) => {
                self.send(reply.clone());
                self.restore(idx, Handler::Static(reply));
            }
            Handler::Typed(func) => {
                func(self, &record.message);
                self.restore(idx, Handler::Typed(func));
            }
            Handler::Enumerating(mut cursor) => {
                if let Some(reply) = cursor.replies.pop_front() {
                    self.send(reply);
                }
                self.handlers[idx] = if cursor.replies.is_empty() {
                    Handler::Static(cursor.exhausted)
                } else {
                    Handler::Enumerating(cursor)
                };
            }
        }
    }

    /// Fire every timer that is due at `now`.
    pub fn poll(&mut self, now: Instant) {
        self.now = now;

        if let Some(due) = self.diag_next {
            if now >= due {
                self.boost_diagnostic();
                self.diag_next = Some(now + self.diag_interval);
            }
        }

        let mut due = Vec::new();
        self.followups.retain(|(at, msg)| {
            if now >= *at {
                due.push(msg.clone());
                false
            } else {
                true
            }
        });
        for msg in due {
            self.send(msg);
        }
    }

    /// The next instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let followup = self.followups.iter().map(|(at, _)| *at).min();
        match (self.diag_next, followup) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Replies queued since the last call.
    pub fn take_outgoing(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.out)
    }

    /// Append a node-table entry, bumping the table version.
    pub fn add_node(&mut self, id: UniqueId) {
        self.nodes.push(id);
        self.node_tab_version = self.node_tab_version.wrapping_add(1);
    }

    pub fn booster_state(&self) -> u8 {
        self.booster_state
    }

    fn install(&mut self, ty: u8, handler: Handler) {
        self.handlers[usize::from(ty)] = handler;
    }

    fn install_static(&mut self, ty: u8, reply: Message) {
        self.install(ty, Handler::Static(reply));
    }

    fn restore(&mut self, idx: usize, handler: Handler) {
        // A typed handler may have re-registered its own slot; keep that.
        if matches!(self.handlers[idx], Handler::None) {
            self.handlers[idx] = handler;
        }
    }

    fn send(&mut self, message: Message) {
        debug!(message = ?message, "SEND");
        self.out.push(message);
    }

    // -- sys -----------------------------------------------------------------

    fn sys_clock(&mut self, time: Time) {
        info!(
            dow = time.dow,
            hour = time.hour,
            minute = time.minute,
            speed = time.speed,
            "model clock"
        );
    }

    // -- node table ----------------------------------------------------------

    fn nodetab_getall(&mut self) {
        self.send(Message::with(MSG_NODETAB_COUNT, (self.nodes.len() as u8,)));

        let version = self.node_tab_version;
        let replies: VecDeque<Message> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, id)| Message::with(MSG_NODETAB, (version, index as u8, *id)))
            .collect();

        self.install(
            MSG_NODETAB_GETNEXT,
            if replies.is_empty() {
                Handler::Static(node_na())
            } else {
                Handler::Enumerating(Enumeration::new(replies, node_na()))
            },
        );
    }

    // -- features ------------------------------------------------------------

    fn feature_getall(&mut self, stream: Option<u8>) {
        if stream.unwrap_or(0) == 1 {
            debug!("feature streaming requested; answering by poll");
        }

        self.send(Message::with(
            MSG_FEATURE_COUNT,
            (self.features.len() as u8,),
        ));

        let replies: VecDeque<Message> = self
            .features
            .iter()
            .map(|(&id, &value)| Message::with(MSG_FEATURE, (id, value)))
            .collect();

        self.install(
            MSG_FEATURE_GETNEXT,
            if replies.is_empty() {
                Handler::Static(feature_na())
            } else {
                Handler::Enumerating(Enumeration::new(replies, feature_na()))
            },
        );
    }

    fn feature_get(&mut self, id: u8) {
        match self.features.get(&id) {
            Some(&value) => self.send(Message::with(MSG_FEATURE, (id, value))),
            None => self.send(feature_na()),
        }
    }

    fn feature_set(&mut self, id: u8, value: u8) {
        if !self.features.contains_key(&id) {
            self.send(feature_na());
            return;
        }
        let stored = self.validate_feature_write(id, value);
        self.features.insert(id, stored);
        self.send(Message::with(MSG_FEATURE, (id, stored)));
    }

    /// Per-id write rules; anything without a rule is read-only and the
    /// stored value wins.
    fn validate_feature_write(&mut self, id: u8, value: u8) -> u8 {
        match id {
            FEATURE_BST_VOLT => {
                let volt = value.clamp(3, 16);
                self.booster_voltage = volt;
                volt
            }
            FEATURE_BST_CURMEAS_INTERVAL => {
                let ticks = value.max(10);
                self.diag_interval = Duration::from_millis(u64::from(ticks) * 10);
                if self.diag_next.is_some() {
                    self.diag_next = Some(self.now + self.diag_interval);
                }
                ticks
            }
            _ => self.features[&id],
        }
    }

    // -- booster -------------------------------------------------------------

    fn boost_query(&mut self) {
        self.send(Message::with(MSG_BOOST_STAT, (self.booster_state,)));
    }

    fn boost_on(&mut self, local: u8) {
        debug!(local, "booster on");
        self.booster_state = BST_STATE_ON;
        self.send(Message::with(MSG_BOOST_STAT, (self.booster_state,)));
        self.diag_next = Some(self.now + self.diag_interval);
    }

    fn boost_off(&mut self, local: u8) {
        debug!(local, "booster off");
        self.booster_state = BST_STATE_OFF;
        self.send(Message::with(MSG_BOOST_STAT, (self.booster_state,)));
        self.diag_next = None;
    }

    fn boost_diagnostic(&mut self) {
        let volt = self.booster_voltage.clamp(0, 25) * 10;
        self.send(Message::with(
            MSG_BOOST_DIAGNOSTIC,
            (
                KeyValue::new(BST_DIAG_I, 100),
                KeyValue::new(BST_DIAG_V, volt),
            ),
        ));
    }

    // -- command station -----------------------------------------------------

    fn cs_set_state(&mut self, state: u8) {
        if state != CS_STATE_QUERY {
            self.cs_state = state;
        }
        self.send(Message::with(MSG_CS_STATE, (self.cs_state,)));
    }

    fn cs_drive(&mut self, drive: CsDrive) {
        debug!(addr = drive.addr, speed = drive.speed, "drive command");
        self.send(Message::with(MSG_CS_DRIVE_ACK, (drive.addr, 1u8)));
    }

    // -- accessories ---------------------------------------------------------

    fn accessory_get(&mut self, num: u8) {
        let aspect = 0u8;
        let total = 3u8;
        self.send(Message::with(
            MSG_ACCESSORY_STATE,
            (num, aspect, total, 0u8, 0u8),
        ));
    }

    fn accessory_set(&mut self, num: u8, aspect: u8) {
        let total = 2u8;
        // Execute bits: operation running, target not yet reached.
        self.send(Message::with(
            MSG_ACCESSORY_STATE,
            (num, aspect, total, 0b0000_0011u8, 10u8),
        ));
        self.followups.push((
            self.now + ACCESSORY_SWITCH_TIME,
            Message::with(MSG_ACCESSORY_STATE, (num, aspect, total, 0b0000_0010u8, 0u8)),
        ));
    }

    fn accessory_para_get(&mut self, anum: u8, pnum: u8) {
        self.send(Message::with(
            MSG_ACCESSORY_PARA,
            (anum, ACCESSORY_PARA_NOTEXIST, pnum),
        ));
    }

    // -- ports ---------------------------------------------------------------

    fn lc_port_query_all(&mut self, select: Option<u16>, start: Option<u16>, end: Option<u16>) {
        let _ = select;
        let start = start.unwrap_or(0);
        let end = end.unwrap_or(0xffff).min(15);
        for port in start..end {
            self.send(Message::with(MSG_LC_STAT, (PORTTYPE_SWITCH, port, 0u8)));
        }
        self.send(Message::with(MSG_LC_NA, (0xffffu16,)));
    }

    fn lc_configx_get_all(&mut self, start: Option<u16>, end: Option<u16>) {
        let start = start.unwrap_or(0);
        let end = end.unwrap_or(0xffff);
        for port in start..=end {
            let porttype = (port & 0xff) as u8;
            if porttype == PORTTYPE_SERVO || porttype == PORTTYPE_SWITCH {
                self.send(Message::with(
                    MSG_LC_CONFIGX,
                    (port, KeyValue::new(PCFG_SERVO_SPEED, 55)),
                ));
            }
        }
    }

    // -- strings -------------------------------------------------------------

    fn string_get(&mut self, ns: u8, id: u8) {
        let key = u16::from_be_bytes([ns, id]);
        let value = self.strings.get(&key).cloned().unwrap_or_default();
        self.send(Message::with(MSG_STRING, (ns, id, value)));
    }

    fn string_set(&mut self, ns: u8, id: u8, value: String) {
        let limit = usize::from(
            self.features
                .get(&FEATURE_STRING_SIZE)
                .copied()
                .unwrap_or(24),
        );
        let value = if latin1_from_str(&value).len() > limit {
            error!(ns, id, limit, "string truncated to namespace limit");
            value.chars().take(limit).collect()
        } else {
            value
        };

        let key = u16::from_be_bytes([ns, id]);
        self.strings.insert(key, value.clone());
        self.send(Message::with(MSG_STRING, (ns, id, value)));
    }
}

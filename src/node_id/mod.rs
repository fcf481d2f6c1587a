use std::fmt;
use std::str::FromStr;

use crate::error::NodeIdError;

pub mod table;

pub type NamespaceIndex = u16;
pub type NumericId = u32;

pub mod namespaces {
    use super::NamespaceIndex;

    pub const STANDARD: NamespaceIndex = 0;
    pub const TS: NamespaceIndex = 1;
    pub const TIT: NamespaceIndex = 2;
    pub const MODBUS_DEVICES: NamespaceIndex = 3;
    pub const GROUP: NamespaceIndex = 4;
    pub const USER: NamespaceIndex = 5;
    pub const HISTORICAL_DB: NamespaceIndex = 6;
    pub const SCADA: NamespaceIndex = 7;
    pub const SIM_ITEM: NamespaceIndex = 9;
    pub const IEC_LINK: NamespaceIndex = 10;
    pub const IEC_DEV: NamespaceIndex = 11;
    pub const MODBUS_PORTS: NamespaceIndex = 12;
    pub const TS_FORMAT: NamespaceIndex = 14;
    pub const SERVER_PARAMS: NamespaceIndex = 15;
    pub const IEC_TRANSMIT: NamespaceIndex = 16;

    const NAMES: [(NamespaceIndex, &str); 15] = [
        (STANDARD, "STANDARD"),
        (TS, "TS"),
        (TIT, "TIT"),
        (MODBUS_DEVICES, "MODBUS_DEVICES"),
        (GROUP, "GROUP"),
        (USER, "USER"),
        (HISTORICAL_DB, "HISTORICAL_DB"),
        (SCADA, "SCADA"),
        (SIM_ITEM, "SIM_ITEM"),
        (IEC_LINK, "IEC_LINK"),
        (IEC_DEV, "IEC_DEV"),
        (MODBUS_PORTS, "MODBUS_PORTS"),
        (TS_FORMAT, "TS_FORMAT"),
        (SERVER_PARAMS, "SERVER_PARAMS"),
        (IEC_TRANSMIT, "IEC_TRANSMIT"),
    ];

    pub fn name(index: NamespaceIndex) -> Option<&'static str> {
        NAMES.iter().find(|(i, _)| *i == index).map(|(_, name)| *name)
    }

    pub fn find(name: &str) -> Option<NamespaceIndex> {
        NAMES.iter().find(|(_, n)| *n == name).map(|(index, _)| *index)
    }
}

include!(concat!(env!("OUT_DIR"), "/node_ids.rs"));

/// Numeric identifiers sort before string identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    Numeric(NumericId),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    namespace_index: NamespaceIndex,
    identifier: Identifier,
}

impl NodeId {
    pub const fn numeric(numeric_id: NumericId, namespace_index: NamespaceIndex) -> Self {
        NodeId { namespace_index, identifier: Identifier::Numeric(numeric_id) }
    }

    pub fn string(string_id: impl Into<String>, namespace_index: NamespaceIndex) -> Self {
        NodeId { namespace_index, identifier: Identifier::String(string_id.into()) }
    }

    pub fn namespace_index(&self) -> NamespaceIndex {
        self.namespace_index
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn numeric_id(&self) -> Option<NumericId> {
        match self.identifier {
            Identifier::Numeric(id) => Some(id),
            Identifier::String(_) => None,
        }
    }

    pub fn string_id(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::Numeric(_) => None,
            Identifier::String(id) => Some(id),
        }
    }

    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && self.identifier == Identifier::Numeric(0)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::numeric(0, namespaces::STANDARD)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "ns={};", self.namespace_index)?;
        }

        match &self.identifier {
            Identifier::Numeric(id) => write!(f, "i={}", id),
            Identifier::String(id) => write!(f, "s={}", id),
        }
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    /// Accepts `[ns=<n>;]i=<id>`, `[ns=<n>;]s=<text>` and bare text, which becomes a string id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NodeIdError::Empty);
        }

        let mut namespace_index = namespaces::STANDARD;
        let mut rest = s;

        if let Some(after) = rest.strip_prefix("ns=") {
            let (index, remainder) = after
                .split_once(';')
                .ok_or_else(|| NodeIdError::MissingNamespaceTerminator { input: s.to_string() })?;
            namespace_index = index
                .parse()
                .map_err(|_| NodeIdError::InvalidNamespace { value: index.to_string() })?;
            rest = remainder;
        }

        if let Some(id) = rest.strip_prefix("i=") {
            let numeric_id = id
                .parse()
                .map_err(|_| NodeIdError::InvalidNumericId { value: id.to_string() })?;
            return Ok(NodeId::numeric(numeric_id, namespace_index));
        }

        let string_id = rest.strip_prefix("s=").unwrap_or(rest);
        Ok(NodeId::string(string_id, namespace_index))
    }
}

/// Finds a generated standard node by its symbolic name.
pub fn lookup(name: &str) -> Option<NodeId> {
    TABLE
        .iter()
        .find(|(row_name, _, _)| *row_name == name)
        .map(|(_, numeric_id, _)| NodeId::numeric(*numeric_id, namespaces::STANDARD))
}

pub fn find_name(numeric_id: NumericId) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(_, id, _)| *id == numeric_id)
        .map(|(name, _, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_the_wire_notation() {
        assert_eq!(NodeId::numeric(85, namespaces::STANDARD).to_string(), "i=85");
        assert_eq!(NodeId::numeric(53, namespaces::TS).to_string(), "ns=1;i=53");
        assert_eq!(NodeId::string("MODBUS_PORTS.32!Online", namespaces::STANDARD).to_string(), "s=MODBUS_PORTS.32!Online");
    }

    #[test]
    fn parses_prefixed_and_bare_forms() {
        assert_eq!("ns=11;i=15".parse::<NodeId>().unwrap(), NodeId::numeric(15, namespaces::IEC_DEV));
        assert_eq!("i=84".parse::<NodeId>().unwrap(), node::RootFolder);
        let group = "ns=4;s=Group.1".parse::<NodeId>().unwrap();
        assert_eq!(group, NodeId::string("Group.1", namespaces::GROUP));
        assert_eq!(group.string_id(), Some("Group.1"));
        assert_eq!(group.numeric_id(), None);
        assert_eq!(
            "MODBUS_PORTS.32!BIT:4".parse::<NodeId>().unwrap(),
            NodeId::string("MODBUS_PORTS.32!BIT:4", namespaces::STANDARD),
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<NodeId>(), Err(NodeIdError::Empty));
        assert!(matches!("ns=3i=5".parse::<NodeId>(), Err(NodeIdError::MissingNamespaceTerminator { .. })));
        assert!(matches!("ns=x;i=5".parse::<NodeId>(), Err(NodeIdError::InvalidNamespace { .. })));
        assert!(matches!("i=-1".parse::<NodeId>(), Err(NodeIdError::InvalidNumericId { .. })));
    }

    #[test]
    fn orders_by_namespace_then_kind() {
        let a = NodeId::numeric(900, namespaces::STANDARD);
        let b = NodeId::string("A", namespaces::STANDARD);
        let c = NodeId::numeric(1, namespaces::TS);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn null_node_id() {
        assert!(NodeId::default().is_null());
        assert!(!NodeId::numeric(0, namespaces::TS).is_null());
        assert!(!node::Boolean.is_null());
    }

    #[test]
    fn generated_table_matches_constants() {
        assert_eq!(id::HasComponent, 47);
        assert_eq!(node::ObjectsFolder.numeric_id(), Some(85));
        assert_eq!(node::ObjectsFolder.namespace_index(), namespaces::STANDARD);
        assert_eq!(lookup("AggregateFunction_Count"), Some(node::AggregateFunction_Count));
        assert_eq!(lookup("NoSuchNode"), None);
        assert_eq!(find_name(id::Organizes), Some("Organizes"));
        assert_eq!(namespaces::name(namespaces::IEC_DEV), Some("IEC_DEV"));
        assert_eq!(namespaces::name(8), None);
    }

    #[test]
    fn namespace_names_resolve_both_ways() {
        assert_eq!(namespaces::find("IEC_DEV"), Some(namespaces::IEC_DEV));
        assert_eq!(namespaces::find("SERVER_PARAMS"), Some(15));
        assert_eq!(namespaces::find("iec_dev"), None);
        assert_eq!(namespaces::find(""), None);
        for index in 0..=16 {
            if let Some(name) = namespaces::name(index) {
                assert_eq!(namespaces::find(name), Some(index));
            }
        }
    }
}

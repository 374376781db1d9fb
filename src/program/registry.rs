//! Certification program registry
//!
//! Contains information about every known certification program. Behavioral
//! differences between programs are expressed as fields of this table rather
//! than as per-program types.

use std::fmt;

/// Known certification programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    N,
    Vht,
    Wmmps,
    Tdls,
    Ve,
    P2p,
    Wfd,
    Pmf,
    Hs2,
    Wpa3,
    He,
    Nan,
    /// A program name that is not in the registry
    Other,
}

impl ProgramKind {
    /// Resolve a program name; names must match the registry exactly
    pub fn from_name(name: &str) -> Self {
        find_by_name(name).map(|p| p.kind).unwrap_or(ProgramKind::Other)
    }

    /// Registry entry for this program, if it is a known one
    pub fn info(&self) -> Option<&'static ProgramInfo> {
        PROGRAMS.iter().find(|p| p.kind == *self)
    }

    /// Whether test cases of this program measure throughput
    pub fn is_throughput(&self) -> bool {
        self.info().map(|p| p.throughput).unwrap_or(false)
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.info() {
            Some(info) => write!(f, "{}", info.name),
            None => write!(f, "other"),
        }
    }
}

/// Information about a certification program
#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub kind: ProgramKind,
    /// Canonical program name as it appears in test plans
    pub name: &'static str,
    /// Brief description
    pub description: &'static str,
    /// Whether the program carries throughput-relevant test cases
    pub throughput: bool,
}

/// All known programs
static PROGRAMS: &[ProgramInfo] = &[
    ProgramInfo {
        kind: ProgramKind::N,
        name: "N",
        description: "802.11n high throughput",
        throughput: true,
    },
    ProgramInfo {
        kind: ProgramKind::Vht,
        name: "VHT",
        description: "802.11ac very high throughput",
        throughput: true,
    },
    ProgramInfo {
        kind: ProgramKind::Wmmps,
        name: "WMMPS",
        description: "WMM power save",
        throughput: true,
    },
    ProgramInfo {
        kind: ProgramKind::Tdls,
        name: "TDLS",
        description: "Tunneled direct link setup",
        throughput: true,
    },
    ProgramInfo {
        kind: ProgramKind::Ve,
        name: "VE",
        description: "Voice-enterprise",
        throughput: true,
    },
    ProgramInfo {
        kind: ProgramKind::P2p,
        name: "P2P",
        description: "Wi-Fi Direct peer-to-peer",
        throughput: false,
    },
    ProgramInfo {
        kind: ProgramKind::Wfd,
        name: "WFD",
        description: "Wi-Fi Display",
        throughput: false,
    },
    ProgramInfo {
        kind: ProgramKind::Pmf,
        name: "PMF",
        description: "Protected management frames",
        throughput: false,
    },
    ProgramInfo {
        kind: ProgramKind::Hs2,
        name: "HS2",
        description: "Hotspot 2.0",
        throughput: false,
    },
    ProgramInfo {
        kind: ProgramKind::Wpa3,
        name: "WPA3",
        description: "WPA3 security",
        throughput: false,
    },
    ProgramInfo {
        kind: ProgramKind::He,
        name: "HE",
        description: "802.11ax high efficiency",
        throughput: false,
    },
    ProgramInfo {
        kind: ProgramKind::Nan,
        name: "NAN",
        description: "Neighbor awareness networking",
        throughput: false,
    },
];

/// Get all known programs
pub fn all_programs() -> &'static [ProgramInfo] {
    PROGRAMS
}

/// Find a program by its exact registry name
pub fn find_by_name(name: &str) -> Option<&'static ProgramInfo> {
    PROGRAMS.iter().find(|p| p.name == name)
}

/// Names of every throughput program
pub fn throughput_programs() -> impl Iterator<Item = &'static str> {
    PROGRAMS.iter().filter(|p| p.throughput).map(|p| p.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_set() {
        let names: Vec<_> = throughput_programs().collect();
        assert_eq!(names, vec!["N", "VHT", "WMMPS", "TDLS", "VE"]);
    }

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(ProgramKind::from_name("VHT"), ProgramKind::Vht);
        assert_eq!(ProgramKind::from_name("P2P"), ProgramKind::P2p);
        assert_eq!(ProgramKind::from_name("vht"), ProgramKind::Other);
        assert_eq!(ProgramKind::from_name(" P2P "), ProgramKind::Other);
        assert_eq!(ProgramKind::from_name("ZIGBEE"), ProgramKind::Other);
    }

    #[test]
    fn test_other_is_not_throughput() {
        assert!(!ProgramKind::Other.is_throughput());
        assert_eq!(ProgramKind::Other.to_string(), "other");
    }

    #[test]
    fn test_every_kind_has_one_entry() {
        for info in all_programs() {
            assert_eq!(
                all_programs().iter().filter(|p| p.kind == info.kind).count(),
                1,
                "{} listed twice",
                info.name
            );
        }
    }
}

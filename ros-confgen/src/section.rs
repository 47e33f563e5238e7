//! RouterOS command-tree paths the generator writes to.

pub const INTERFACE_BRIDGE: &str = "/interface bridge";
pub const INTERFACE_WIREGUARD: &str = "/interface wireguard";
pub const INTERFACE_WIREGUARD_PEERS: &str = "/interface wireguard peers";
pub const INTERFACE_OVPN_CLIENT: &str = "/interface ovpn-client";
pub const INTERFACE_PPTP_CLIENT: &str = "/interface pptp-client";
pub const INTERFACE_L2TP_CLIENT: &str = "/interface l2tp-client";
pub const INTERFACE_SSTP_CLIENT: &str = "/interface sstp-client";
pub const INTERFACE_LIST: &str = "/interface list";
pub const INTERFACE_LIST_MEMBER: &str = "/interface list member";
pub const IPSEC_PROFILE: &str = "/ip ipsec profile";
pub const IPSEC_PROPOSAL: &str = "/ip ipsec proposal";
pub const IPSEC_MODE_CONFIG: &str = "/ip ipsec mode-config";
pub const IPSEC_POLICY_GROUP: &str = "/ip ipsec policy group";
pub const IPSEC_POLICY: &str = "/ip ipsec policy";
pub const IPSEC_PEER: &str = "/ip ipsec peer";
pub const IPSEC_IDENTITY: &str = "/ip ipsec identity";
pub const IP_ADDRESS: &str = "/ip address";
pub const ROUTING_TABLE: &str = "/routing table";
pub const IP_ROUTE: &str = "/ip route";
pub const IP_DNS: &str = "/ip dns";
pub const IP_DNS_FORWARDERS: &str = "/ip dns forwarders";
pub const ADDRESS_LIST: &str = "/ip firewall address-list";
pub const MANGLE: &str = "/ip firewall mangle";
pub const NAT: &str = "/ip firewall nat";
pub const IP_SERVICE: &str = "/ip service";

/// Section order of a generated script.
///
/// Objects are created before anything that references them: interfaces
/// before list membership and addresses, routing tables before routes,
/// IPsec profiles and proposals before the peers and policies using them.
pub const EMISSION_ORDER: &[&str] = &[
    INTERFACE_BRIDGE,
    INTERFACE_WIREGUARD,
    INTERFACE_WIREGUARD_PEERS,
    INTERFACE_OVPN_CLIENT,
    INTERFACE_PPTP_CLIENT,
    INTERFACE_L2TP_CLIENT,
    INTERFACE_SSTP_CLIENT,
    IPSEC_PROFILE,
    IPSEC_PROPOSAL,
    IPSEC_MODE_CONFIG,
    IPSEC_POLICY_GROUP,
    IPSEC_PEER,
    IPSEC_POLICY,
    IPSEC_IDENTITY,
    INTERFACE_LIST,
    INTERFACE_LIST_MEMBER,
    IP_ADDRESS,
    ROUTING_TABLE,
    IP_ROUTE,
    IP_DNS,
    IP_DNS_FORWARDERS,
    ADDRESS_LIST,
    MANGLE,
    NAT,
    IP_SERVICE,
];

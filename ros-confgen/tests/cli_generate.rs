use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

const JSON_SCRIPT: &str = "\
/interface list
add name=WAN
/interface list member
add interface=ether1 list=WAN
/routing table
add name=to-VPN fib
add name=to-Domestic fib
add name=to-ISP-A fib
/ip route
add dst-address=178.22.122.100/32 gateway=192.0.2.1 scope=10
add dst-address=0.0.0.0/0 gateway=178.22.122.100 routing-table=to-Domestic target-scope=11 check-gateway=ping distance=1
add dst-address=0.0.0.0/0 gateway=178.22.122.100 routing-table=to-ISP-A target-scope=11 check-gateway=ping
/ip dns
set allow-remote-requests=yes
/ip dns forwarders
add name=VPN dns-servers=1.1.1.1
add name=Domestic dns-servers=178.22.122.100
/ip firewall mangle
add chain=input in-interface=ether1 protocol=tcp dst-port=2222 connection-state=new action=mark-connection new-connection-mark=conn-ISP-A passthrough=yes
add chain=output connection-mark=conn-ISP-A action=mark-routing new-routing-mark=to-ISP-A passthrough=no
/ip firewall nat
add chain=srcnat out-interface-list=WAN action=masquerade
/ip service
set ssh disabled=no port=2222
";

#[test]
fn generate_json_topology_prints_full_script() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    let output = cmd
        .arg("generate")
        .arg(fixture("fixtures/topology-basic.json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8_lossy(&output), JSON_SCRIPT);
}

#[test]
fn generate_toml_topology_emits_every_protocol_section() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    cmd.arg("generate")
        .arg(fixture("fixtures/topology-basic.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("/interface wireguard\n"))
        .stdout(predicate::str::contains("/interface wireguard peers\n"))
        .stdout(predicate::str::contains("/interface l2tp-client\n"))
        .stdout(predicate::str::contains("use-ipsec=yes ipsec-secret=\"shared key\""))
        .stdout(predicate::str::contains("name=VPN dns-servers=8.8.8.8,9.9.9.9"))
        .stdout(predicate::str::contains("new-routing-mark=to-Transit"))
        .stdout(predicate::str::contains("set winbox disabled=no\n"));
}

#[test]
fn generate_writes_output_file_and_summary() {
    let dir = tempdir().expect("tempdir");
    let out_path = dir.path().join("router.rsc");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    cmd.arg("generate")
        .arg(fixture("fixtures/topology-basic.toml"))
        .arg("--output")
        .arg(&out_path)
        .arg("--no-comments")
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("generated sections="));

    let contents = fs::read_to_string(&out_path).expect("script should be written");
    assert!(contents.starts_with("/interface wireguard\n"));
    assert!(!contents.contains("comment="));
}

#[test]
fn generate_refuses_to_overwrite_topology() {
    let dir = tempdir().expect("tempdir");
    let topology = dir.path().join("topology.json");
    fs::copy(fixture("fixtures/topology-basic.json"), &topology).expect("copy fixture");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    cmd.arg("generate")
        .arg(&topology)
        .arg("-o")
        .arg(&topology)
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite topology file"));
}

#[test]
fn generate_aborts_on_invalid_client_by_default() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    cmd.arg("generate")
        .arg(fixture("fixtures/topology-invalid.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "VPN client 'broken' (PPTP): missing required field `server`",
        ));
}

#[test]
fn generate_skip_invalid_keeps_the_rest() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    cmd.arg("generate")
        .arg(fixture("fixtures/topology-invalid.toml"))
        .arg("--skip-invalid")
        .arg("--no-comments")
        .assert()
        .success()
        .stdout(predicate::str::contains("name=SSTP-good"))
        .stdout(predicate::str::contains("PPTP-broken").not())
        // the surviving client is the only VPN member, so it takes the first VPN address
        .stdout(predicate::str::contains(
            "add dst-address=1.1.1.1/32 gateway=SSTP-good scope=10",
        ))
        .stderr(predicate::str::contains("skipping invalid entity"));
}

#[test]
fn generate_json_format_is_a_section_map() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    let output = cmd
        .arg("generate")
        .arg(fixture("fixtures/topology-basic.json"))
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(
        value["/ip service"],
        serde_json::json!(["set ssh disabled=no port=2222"])
    );
}

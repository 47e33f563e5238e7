use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn checkip_table_shows_vpn_after_foreign() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    cmd.env("NO_COLOR", "1")
        .arg("checkip")
        .arg(fixture("fixtures/topology-basic.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("checkip domestic=2 foreign=1 vpn=2"))
        .stdout(predicate::str::is_match(r"Wireguard-edge\s+8\.8\.8\.8").expect("regex"))
        .stdout(predicate::str::is_match(r"L2TP-office\s+9\.9\.9\.9").expect("regex"))
        .stdout(predicate::str::is_match(r"Transit\s+1\.1\.1\.1").expect("regex"));
}

#[test]
fn checkip_json_reports_fallback_forwarders() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-confgen"));
    let output = cmd
        .arg("checkip")
        .arg(fixture("fixtures/topology-basic.json"))
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(value["counts"]["vpn"], 0);
    assert_eq!(value["forwarders"][0]["network"], "vpn");
    assert_eq!(value["forwarders"][0]["servers"], "1.1.1.1");
    assert_eq!(value["forwarders"][0]["fallback"], true);
}

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("hexseal"))
}

fn seal(passphrase: &str, cleartext_hex: &str, extra: &[&str]) -> String {
    let out = bin()
        .env("HEXSEAL_PASSPHRASE", passphrase)
        .arg("seal")
        .arg(cleartext_hex)
        .args(["--argon-mem", "64", "--argon-time", "1"])
        .args(extra)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(out).unwrap().trim().to_string()
}

#[test]
fn seal_and_open_roundtrip() {
    let sealed = seal("correct horse", "0001ff", &[]);
    assert!(!sealed.is_empty());

    bin()
        .env("HEXSEAL_PASSPHRASE", "correct horse")
        .arg("open")
        .arg(&sealed)
        .assert()
        .success()
        .stdout(predicate::eq("0001ff\n"));
}

#[test]
fn passphrase_can_be_piped() {
    let sealed = seal("piped", "beef", &[]);

    bin()
        .env_remove("HEXSEAL_PASSPHRASE")
        .arg("open")
        .arg(&sealed)
        .write_stdin("piped\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("beef"));
}

#[test]
fn aes_gcm_can_be_selected() {
    let sealed = seal("pw", "00", &["--cipher", "aes-256-gcm"]);

    bin()
        .arg("inspect")
        .arg(&sealed)
        .assert()
        .success()
        .stdout(predicate::str::contains("Aes256Gcm"));
}

#[test]
fn wrong_passphrase_fails() {
    let sealed = seal("correct", "00", &[]);

    bin()
        .env("HEXSEAL_PASSPHRASE", "wrong")
        .arg("open")
        .arg(&sealed)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid passphrase or corrupted data"));
}

#[test]
fn invalid_hex_fails() {
    bin()
        .env("HEXSEAL_PASSPHRASE", "pw")
        .arg("seal")
        .arg("not-hex")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid hex"));
}

#[test]
fn invalid_argon_params_fail() {
    bin()
        .env("HEXSEAL_PASSPHRASE", "pw")
        .args(["seal", "00", "--argon-time", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("time cost"));
}

#[test]
fn inspect_prints_json() {
    let sealed = seal("pw", "010203", &[]);

    let out = bin()
        .args(["inspect", "--json"])
        .arg(&sealed)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let info: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(info["version"], 1);
    assert_eq!(info["kdf"], "argon2id");
    assert_eq!(info["cipher"], "xchacha20-poly1305");
    assert_eq!(info["kdf_params"]["mem_cost_kib"], 64);
    assert_eq!(info["ciphertext_len"], 3);
}

#[test]
fn inspect_rejects_garbage() {
    bin()
        .args(["inspect", "00112233"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed container"));
}

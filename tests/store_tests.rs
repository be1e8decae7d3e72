use otpkeep::error::{Error, OtpError, StoreError};
use otpkeep::store::Store;
use otpkeep::totp::TotpSpec;
use tempfile::TempDir;

fn temp_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("nested").join("accounts.json"));
    (dir, store)
}

#[test]
fn missing_file_is_empty() {
    let (_dir, store) = temp_store();
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn append_then_load() {
    let (_dir, store) = temp_store();
    let a = store
        .append(TotpSpec::new("GitHub", "alice", "JBSWY3DPEHPK3PXP"))
        .unwrap();
    let b = store
        .append(TotpSpec::new("", "bob", "GEZDGNBVGY3TQOJQ"))
        .unwrap();
    assert_ne!(a.id, b.id);

    let all = store.load_all().unwrap();
    assert_eq!(all, vec![a.clone(), b]);

    // A second handle on the same file sees the same records.
    let again = Store::new(store.path());
    assert_eq!(again.load_all().unwrap()[0], a);
}

#[test]
fn file_uses_camel_case_records() {
    let (_dir, store) = temp_store();
    store
        .append(TotpSpec::new("GitHub", "alice", "JBSWY3DPEHPK3PXP"))
        .unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let rec = &v[0];
    for key in ["id", "issuer", "account", "secret", "digits", "period", "createdAt"] {
        assert!(rec.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(rec["digits"], 6);
    assert_eq!(rec["period"], 30);
}

#[test]
fn delete_by_id() {
    let (_dir, store) = temp_store();
    let a = store.append(TotpSpec::new("", "alice", "AB")).unwrap();
    let b = store.append(TotpSpec::new("", "bob", "AB")).unwrap();

    let removed = store.delete(&a.id).unwrap();
    assert_eq!(removed, a);
    assert_eq!(store.load_all().unwrap(), vec![b]);

    let err = store.delete(&a.id).unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::NotFound(_))));
}

#[test]
fn redefine_changes_only_digits_and_period() {
    let (_dir, store) = temp_store();
    let a = store
        .append(TotpSpec::new("RFC", "test", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"))
        .unwrap();

    let updated = store.redefine(&a.id, 8, 60).unwrap();
    assert_eq!(updated.spec.digits, 8);
    assert_eq!(updated.spec.period, 60);
    assert_eq!(updated.spec.secret, a.spec.secret);
    assert_eq!(updated.created_at, a.created_at);
    assert_eq!(store.load_all().unwrap(), vec![updated]);

    assert!(matches!(
        store.redefine(&a.id, 0, 30),
        Err(Error::Otp(OtpError::InvalidDigits))
    ));
    assert!(matches!(
        store.redefine(&a.id, 70_000, 30),
        Err(Error::Otp(OtpError::InvalidDigits))
    ));
    assert!(matches!(
        store.redefine(&a.id, 6, 0),
        Err(Error::Otp(OtpError::InvalidPeriod))
    ));
    assert!(matches!(
        store.redefine("nope", 6, 30),
        Err(Error::Store(StoreError::NotFound(_)))
    ));
}

#[test]
fn find_by_id_prefix_and_label() {
    let (_dir, store) = temp_store();
    let a = store.append(TotpSpec::new("GitHub", "alice", "AB")).unwrap();
    let b = store.append(TotpSpec::new("GitLab", "alice", "AB")).unwrap();

    assert_eq!(store.find(&a.id).unwrap(), a);
    assert_eq!(store.find("github:ALICE").unwrap(), a);
    assert_eq!(store.find("GitLab:alice").unwrap(), b);

    let prefix = &b.id[..8];
    if !a.id.starts_with(prefix) {
        assert_eq!(store.find(prefix).unwrap(), b);
    }

    assert!(matches!(
        store.find("alice"),
        Err(Error::Store(StoreError::Ambiguous { count: 2, .. }))
    ));
    assert!(matches!(
        store.find("carol"),
        Err(Error::Store(StoreError::NotFound(_)))
    ));
}

#[test]
fn corrupt_file_is_reported() {
    let (_dir, store) = temp_store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "{ not json").unwrap();

    assert!(matches!(
        store.load_all(),
        Err(Error::Store(StoreError::Json(_)))
    ));
}

#[test]
fn stored_credential_generates_codes() {
    let (_dir, store) = temp_store();
    let mut spec = TotpSpec::new("RFC", "test", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
    spec.digits = 8;
    store.append(spec).unwrap();

    let cred = store.find("RFC:test").unwrap();
    assert_eq!(cred.spec.get_otp_at(1111111111).unwrap(), "14050471");
}

#[test]
fn hand_edited_digits_give_an_error_not_a_panic() {
    let (_dir, store) = temp_store();
    let a = store
        .append(TotpSpec::new("RFC", "test", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"))
        .unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let raw = raw.replace("\"digits\": 6", "\"digits\": 4294967295");
    std::fs::write(store.path(), raw).unwrap();

    let cred = store.find(&a.id).unwrap();
    assert_eq!(cred.spec.digits, u32::MAX);
    assert_eq!(cred.spec.get_otp_at(59), Err(OtpError::InvalidDigits));
}

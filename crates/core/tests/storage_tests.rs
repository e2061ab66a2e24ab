// ═══════════════════════════════════════════════════════════════════
// Storage Tests — key-value stores, persistence gateway, encryption,
// backup format, BackupManager
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use finance_tracker_core::config::TrackerConfig;
use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::ledger::Ledger;
use finance_tracker_core::models::transaction::{NewTransaction, Transaction, TransactionId};
use finance_tracker_core::storage::backup::{Backup, BackupManager};
use finance_tracker_core::storage::encryption::{random_bytes, KdfParams, SealingKey};
use finance_tracker_core::storage::format::{BackupHeader, CURRENT_VERSION, HEADER_LEN, MAGIC};
use finance_tracker_core::storage::gateway::PersistenceGateway;
use finance_tracker_core::storage::kv::{FileStore, KeyValueStore, MemoryStore};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Cheap Argon2 costs so tests stay fast.
fn fast_kdf() -> KdfParams {
    KdfParams {
        memory_cost: 8,
        time_cost: 1,
        parallelism: 1,
    }
}

fn sample_ledger() -> Ledger {
    Ledger::from_transactions(vec![
        Transaction::from_new(NewTransaction::expense(50.0, "Food", d(2024, 3, 2), "USD").with_description("groceries, weekly")),
        Transaction::from_new(NewTransaction::income(200.0, "Salary", d(2024, 3, 1), "USD")),
        Transaction::from_new(NewTransaction::expense(12.34, "Books", d(2023, 11, 30), "EUR")),
    ])
}

// ═══════════════════════════════════════════════════════════════════
// MemoryStore
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[test]
    fn get_missing_is_none() {
        assert_eq!(MemoryStore::new().get("anything"), None);
    }

    #[test]
    fn set_then_get() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_overwrites() {
        let mut store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let store = FileStore::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn set_then_get_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::new(dir.path()).unwrap();
            store.set("selected_currency", "EUR").unwrap();
        }
        let store = FileStore::new(dir.path()).unwrap();
        assert_eq!(store.get("selected_currency").as_deref(), Some("EUR"));
        assert!(dir.path().join("selected_currency.json").is_file());
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.set("k", "v").unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert_eq!(store.get("finance_tracker_data"), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        for key in ["", "../escape", "a/b", "with space", "dot.ted"] {
            let err = store.set(key, "x").unwrap_err();
            assert!(matches!(err, CoreError::InvalidStorageKey(_)), "key {key:?}");
            assert_eq!(store.get(key), None);
        }
    }

    #[test]
    fn accepts_dash_and_underscore() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.set("my-ledger_2", "[]").unwrap();
        assert_eq!(store.get("my-ledger_2").as_deref(), Some("[]"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// PersistenceGateway
// ═══════════════════════════════════════════════════════════════════

mod gateway {
    use super::*;

    #[test]
    fn ledger_round_trip() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        let ledger = sample_ledger();
        gateway.save_ledger(&mut store, &ledger).unwrap();
        assert_eq!(gateway.load_ledger(&store), ledger);
    }

    #[test]
    fn empty_ledger_round_trip() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        gateway.save_ledger(&mut store, &Ledger::new()).unwrap();
        assert_eq!(store.get("finance_tracker_data").as_deref(), Some("[]"));
        assert!(gateway.load_ledger(&store).is_empty());
    }

    #[test]
    fn save_overwrites_previous_value() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        gateway.save_ledger(&mut store, &sample_ledger()).unwrap();
        gateway.save_ledger(&mut store, &Ledger::new()).unwrap();
        assert!(gateway.load_ledger(&store).is_empty());
    }

    #[test]
    fn absent_ledger_loads_empty() {
        assert!(PersistenceGateway::default().load_ledger(&MemoryStore::new()).is_empty());
    }

    #[test]
    fn corrupt_ledger_loads_empty() {
        let gateway = PersistenceGateway::default();
        for garbage in ["", "not json", "{\"a\":1}", "[{\"id\":1}]", "null", "[1,2"] {
            let mut store = MemoryStore::new();
            store.set("finance_tracker_data", garbage).unwrap();
            assert!(gateway.load_ledger(&store).is_empty(), "input {garbage:?}");
        }
    }

    #[test]
    fn loads_browser_written_ledger() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        store
            .set(
                "finance_tracker_data",
                r#"[{"id":"1718000000001","type":"income","amount":200,"category":"Salary","description":"","date":"2024-06-10","currency":"USD"},
                    {"id":"1718000000000","type":"expense","amount":50,"category":"Food","description":"","date":"2024-06-09","currency":"USD"}]"#,
            )
            .unwrap();
        let ledger = gateway.load_ledger(&store);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.transactions[0].id, TransactionId::from("1718000000001"));
        assert_eq!(ledger.transactions[1].amount, 50.0);
    }

    #[test]
    fn unreadable_entry_does_not_drop_the_rest() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        let mut ledger = sample_ledger();
        ledger.transactions[1].amount = f64::INFINITY;
        gateway.save_ledger(&mut store, &ledger).unwrap();
        assert!(store.get("finance_tracker_data").unwrap().contains("\"amount\":null"));

        let loaded = gateway.load_ledger(&store);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.transactions[0], ledger.transactions[0]);
        assert_eq!(loaded.transactions[1], ledger.transactions[2]);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        store
            .set(
                "finance_tracker_data",
                r#"[{"id":"a","type":"income","amount":null,"category":"Salary","date":"2024-06-10","currency":"USD"},
                    {"id":"b","type":"transfer","amount":1,"category":"X","date":"2024-06-10","currency":"USD"},
                    {"id":"c","type":"expense","amount":7.5,"category":"Food","date":"2024-06-09","currency":"USD"}]"#,
            )
            .unwrap();
        let ledger = gateway.load_ledger(&store);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.transactions[0].id, TransactionId::from("c"));
    }

    #[test]
    fn duplicate_ids_dropped_on_load() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        let mut ledger = sample_ledger();
        let dup = ledger.transactions[0].clone();
        ledger.transactions.push(dup);
        gateway.save_ledger(&mut store, &ledger).unwrap();
        assert_eq!(gateway.load_ledger(&store).len(), 3);
    }

    #[test]
    fn currency_round_trip() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        gateway.save_selected_currency(&mut store, "GBP").unwrap();
        assert_eq!(store.get("selected_currency").as_deref(), Some("GBP"));
        assert_eq!(gateway.load_selected_currency(&store), "GBP");
    }

    #[test]
    fn currency_defaults_when_absent_or_blank() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        assert_eq!(gateway.load_selected_currency(&store), "USD");
        store.set("selected_currency", "  ").unwrap();
        assert_eq!(gateway.load_selected_currency(&store), "USD");
    }

    #[test]
    fn unknown_currency_code_kept() {
        let gateway = PersistenceGateway::default();
        let mut store = MemoryStore::new();
        store.set("selected_currency", "ZZZ").unwrap();
        assert_eq!(gateway.load_selected_currency(&store), "ZZZ");
    }

    #[test]
    fn keys_and_default_from_config() {
        let config = TrackerConfig {
            ledger_key: "ledger-b".into(),
            currency_key: "currency-b".into(),
            default_currency: "EUR".into(),
        };
        let gateway = PersistenceGateway::new(config);
        let mut store = MemoryStore::new();
        assert_eq!(gateway.load_selected_currency(&store), "EUR");
        gateway.save_ledger(&mut store, &sample_ledger()).unwrap();
        gateway.save_selected_currency(&mut store, "JPY").unwrap();
        assert!(store.get("ledger-b").is_some());
        assert_eq!(store.get("currency-b").as_deref(), Some("JPY"));
        assert_eq!(store.get("finance_tracker_data"), None);
    }

    #[test]
    fn file_store_write_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        let gateway = PersistenceGateway::new(TrackerConfig {
            ledger_key: "bad/key".into(),
            ..TrackerConfig::default()
        });
        let err = gateway.save_ledger(&mut store, &sample_ledger()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStorageKey(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Encryption
// ═══════════════════════════════════════════════════════════════════

mod encryption {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(KdfParams::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_params_rejected() {
        let bad = [
            KdfParams { memory_cost: 4, ..fast_kdf() },
            KdfParams { memory_cost: 2_000_000, ..fast_kdf() },
            KdfParams { time_cost: 0, ..fast_kdf() },
            KdfParams { time_cost: 21, ..fast_kdf() },
            KdfParams { parallelism: 0, ..fast_kdf() },
            KdfParams { parallelism: 17, ..fast_kdf() },
        ];
        for params in bad {
            assert!(matches!(params.validate(), Err(CoreError::InvalidFileFormat(_))), "{params:?}");
        }
    }

    #[test]
    fn derive_is_deterministic() {
        let salt = [9u8; 16];
        let nonce = [1u8; 12];
        let a = SealingKey::derive("pw", &salt, &fast_kdf()).unwrap();
        let b = SealingKey::derive("pw", &salt, &fast_kdf()).unwrap();
        let sealed = a.seal(&nonce, b"ledger").unwrap();
        assert_eq!(b.open(&nonce, &sealed).unwrap(), b"ledger");
    }

    #[test]
    fn wrong_password_fails() {
        let salt = [3u8; 16];
        let nonce = [4u8; 12];
        let right = SealingKey::derive("right", &salt, &fast_kdf()).unwrap();
        let wrong = SealingKey::derive("wrong", &salt, &fast_kdf()).unwrap();
        let sealed = right.seal(&nonce, b"secret").unwrap();
        assert!(matches!(wrong.open(&nonce, &sealed), Err(CoreError::Decryption)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = SealingKey::derive("pw", &[5u8; 16], &fast_kdf()).unwrap();
        let nonce = [6u8; 12];
        let mut sealed = key.seal(&nonce, b"secret").unwrap();
        sealed[0] ^= 0x01;
        assert!(matches!(key.open(&nonce, &sealed), Err(CoreError::Decryption)));
    }

    #[test]
    fn ciphertext_carries_tag() {
        let key = SealingKey::derive("pw", &[5u8; 16], &fast_kdf()).unwrap();
        let sealed = key.seal(&[0u8; 12], b"").unwrap();
        assert_eq!(sealed.len(), 16);
    }

    #[test]
    fn debug_hides_key_material() {
        let key = SealingKey::derive("pw", &[5u8; 16], &fast_kdf()).unwrap();
        assert_eq!(format!("{key:?}"), "SealingKey(..)");
    }

    #[test]
    fn random_bytes_differ() {
        let a: [u8; 16] = random_bytes().unwrap();
        let b: [u8; 16] = random_bytes().unwrap();
        assert_ne!(a, b);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Backup header format
// ═══════════════════════════════════════════════════════════════════

mod format {
    use super::*;

    fn header() -> BackupHeader {
        BackupHeader {
            version: CURRENT_VERSION,
            kdf_params: fast_kdf(),
            salt: [7u8; 16],
            nonce: [8u8; 12],
        }
    }

    #[test]
    fn header_len_constant() {
        assert_eq!(HEADER_LEN, 46);
        assert_eq!(header().encode(&[]).len(), HEADER_LEN);
    }

    #[test]
    fn encode_layout() {
        let bytes = header().encode(&[0xAAu8, 0xBB]);
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(&bytes[4..6], &CURRENT_VERSION.to_le_bytes());
        assert_eq!(&bytes[6..10], &8u32.to_le_bytes());
        assert_eq!(&bytes[HEADER_LEN..], &[0xAAu8, 0xBB]);
    }

    #[test]
    fn decode_round_trip() {
        let bytes = header().encode(b"payload");
        let (decoded, ciphertext) = BackupHeader::decode(&bytes).unwrap();
        assert_eq!(decoded, header());
        assert_eq!(ciphertext, b"payload");
    }

    #[test]
    fn too_short_rejected() {
        let bytes = header().encode(&[]);
        let err = BackupHeader::decode(&bytes[..HEADER_LEN - 1]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(_)));
    }

    #[test]
    fn bad_magic_rejected() {
        let mut bytes = header().encode(b"x");
        bytes[0] = b'X';
        assert!(matches!(BackupHeader::decode(&bytes), Err(CoreError::InvalidFileFormat(_))));
    }

    #[test]
    fn unsupported_versions_rejected() {
        for version in [0u16, CURRENT_VERSION + 1] {
            let bytes = BackupHeader { version, ..header() }.encode(b"x");
            assert!(matches!(
                BackupHeader::decode(&bytes),
                Err(CoreError::UnsupportedVersion(v)) if v == version
            ));
        }
    }

    #[test]
    fn hostile_kdf_params_rejected() {
        let bytes = BackupHeader {
            kdf_params: KdfParams { memory_cost: u32::MAX, ..fast_kdf() },
            ..header()
        }
        .encode(b"x");
        assert!(matches!(BackupHeader::decode(&bytes), Err(CoreError::InvalidFileFormat(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
// BackupManager
// ═══════════════════════════════════════════════════════════════════

mod backup_manager {
    use super::*;

    fn manager() -> BackupManager {
        BackupManager::with_kdf_params(fast_kdf())
    }

    #[test]
    fn seal_open_round_trip() {
        let backup = Backup::new(sample_ledger().transactions, "EUR");
        let bytes = manager().seal(&backup, "hunter2").unwrap();
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(manager().open(&bytes, "hunter2").unwrap(), backup);
    }

    #[test]
    fn open_uses_header_params() {
        let backup = Backup::new(Vec::new(), "USD");
        let bytes = manager().seal(&backup, "pw").unwrap();
        // A manager configured with other costs can still read it.
        let reader = BackupManager::new();
        assert_eq!(reader.open(&bytes, "pw").unwrap(), backup);
    }

    #[test]
    fn wrong_password() {
        let bytes = manager().seal(&Backup::new(Vec::new(), "USD"), "right").unwrap();
        assert!(matches!(manager().open(&bytes, "wrong"), Err(CoreError::Decryption)));
    }

    #[test]
    fn each_seal_uses_fresh_salt_and_nonce() {
        let backup = Backup::new(Vec::new(), "USD");
        let a = manager().seal(&backup, "pw").unwrap();
        let b = manager().seal(&backup, "pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let bytes = manager().seal(&Backup::new(sample_ledger().transactions, "USD"), "pw").unwrap();
        let cut = &bytes[..bytes.len() - 1];
        assert!(matches!(manager().open(cut, "pw"), Err(CoreError::Decryption)));
    }

    #[test]
    fn invalid_manager_params_refuse_to_seal() {
        let bad = BackupManager::with_kdf_params(KdfParams { parallelism: 0, ..fast_kdf() });
        assert!(matches!(
            bad.seal(&Backup::new(Vec::new(), "USD"), "pw"),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }
}

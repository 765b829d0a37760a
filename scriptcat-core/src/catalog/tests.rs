//! Integration tests for the catalog module

#[cfg(test)]
mod integration_tests {
    use pretty_assertions::assert_eq;
    use std::io::{self, Read, Write};

    use crate::catalog::{Catalog, CatalogError, Entry, Header};

    fn sample_entries() -> Vec<Entry> {
        vec![
            Entry {
                origin: "lines".to_string(),
                project_name: "awake".to_string(),
                author: "tehn".to_string(),
                url: "https://llllllll.co/t/awake/21022".to_string(),
            },
            Entry {
                origin: "lines".to_string(),
                project_name: "cheat-codes-2".to_string(),
                author: "dan_derks".to_string(),
                url: "https://llllllll.co/t/cheat-codes-2/38414".to_string(),
            },
            Entry {
                origin: "community".to_string(),
                project_name: "mlr".to_string(),
                author: "".to_string(),
                url: "https://github.com/tehn/mlr".to_string(),
            },
        ]
    }

    fn sorted(mut entries: Vec<Entry>) -> Vec<Entry> {
        entries.sort_by(|a, b| a.project_name.cmp(&b.project_name));
        entries
    }

    /// Store followed by load yields the same entries and header
    #[test]
    fn test_store_load_roundtrip() {
        let mut catalog = Catalog::new();
        for entry in sample_entries() {
            catalog.insert(entry);
        }

        let mut bytes = Vec::new();
        catalog.store(&mut bytes).unwrap();

        let loaded = Catalog::load(bytes.as_slice()).unwrap();
        assert_eq!(loaded.header(), &Header::current());
        assert_eq!(sorted(loaded.entries()), sorted(sample_entries()));
    }

    #[test]
    fn test_overwrite_by_key_keeps_last_insert() {
        let mut catalog = Catalog::new();
        catalog.insert(Entry {
            origin: "lines".to_string(),
            project_name: "awake".to_string(),
            author: "first".to_string(),
            url: "https://a.example/awake".to_string(),
        });
        let second = Entry {
            origin: "download".to_string(),
            project_name: "awake".to_string(),
            author: "second".to_string(),
            url: "https://b.example/awake".to_string(),
        };
        catalog.insert(second.clone());

        assert_eq!(catalog.entries(), vec![second]);
    }

    /// A catalog loaded with a different header loads fine but cannot be stored
    #[test]
    fn test_header_gate_on_store() {
        let doc = r#"{
            "file_info": { "version": 2, "kind": "script_catalog" },
            "entries": {
                "awake": {
                    "origin": "lines",
                    "project_name": "awake",
                    "author": "tehn",
                    "url": "https://llllllll.co/t/awake/21022"
                }
            }
        }"#;

        let catalog = Catalog::load(doc.as_bytes()).unwrap();
        assert_eq!(catalog.header().version, 2);
        assert_eq!(catalog.len(), 1);

        let mut out = Vec::new();
        let err = catalog.store(&mut out).unwrap_err();
        match err {
            CatalogError::HeaderMismatch { found, expected } => {
                assert_eq!(found.version, 2);
                assert_eq!(expected, Header::current());
            }
            other => panic!("expected HeaderMismatch, got {other:?}"),
        }
        assert!(out.is_empty(), "nothing should be written on mismatch");
    }

    #[test]
    fn test_header_gate_on_foreign_kind() {
        let doc = r#"{"file_info":{"version":1,"kind":"dust_index"},"entries":{}}"#;
        let catalog = Catalog::load(doc.as_bytes()).unwrap();

        let err = catalog.store(Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::HeaderMismatch { .. }));
    }

    #[test]
    fn test_missing_file_info_loads_but_does_not_store() {
        let catalog = Catalog::load(r#"{"entries":{}}"#.as_bytes()).unwrap();
        assert_eq!(catalog.header(), &Header::default());

        let err = catalog.store(Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::HeaderMismatch { .. }));
    }

    #[test]
    fn test_null_entries_load_as_empty() {
        let doc = r#"{"file_info":{"version":1,"kind":"script_catalog"},"entries":null}"#;
        let catalog = Catalog::load(doc.as_bytes()).unwrap();

        assert!(catalog.is_empty());
        assert_eq!(catalog.header(), &Header::current());
    }

    #[test]
    fn test_null_file_info_loads_as_zero_header() {
        let catalog = Catalog::load(r#"{"file_info":null,"entries":{}}"#.as_bytes()).unwrap();
        assert_eq!(catalog.header(), &Header::default());

        let err = catalog.store(Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::HeaderMismatch { .. }));
    }

    #[test]
    fn test_null_entry_fields_load_as_empty_strings() {
        let doc = r#"{
  "file_info": { "version": 1, "kind": "script_catalog" },
  "entries": {
    "awake": { "origin": "lines", "project_name": "awake", "author": null, "url": null }
  }
}"#;
        let catalog = Catalog::load(doc.as_bytes()).unwrap();

        let entry = catalog.get("awake").unwrap();
        assert_eq!(entry.author, "");
        assert_eq!(entry.url, "");
        assert_eq!(entry.origin, "lines");
    }

    #[test]
    fn test_store_write_failure() {
        struct FailingWriter;

        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut catalog = Catalog::new();
        for entry in sample_entries() {
            catalog.insert(entry);
        }

        let err = catalog.store(FailingWriter).unwrap_err();
        match err {
            CatalogError::Write(source) => assert_eq!(source.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected Write, got {other:?}"),
        }
    }

    #[test]
    fn test_load_truncated_json() {
        let doc = r#"{"file_info":{"version":1,"kind":"script_catalog"},"entries":{"aw"#;
        let err = Catalog::load(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Deserialize(_)));
        assert!(err.is_deserialization());
    }

    #[test]
    fn test_load_entries_as_array() {
        let doc = r#"{"file_info":{"version":1,"kind":"script_catalog"},"entries":[]}"#;
        let err = Catalog::load(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Deserialize(_)));
    }

    #[test]
    fn test_load_empty_input() {
        let err = Catalog::load(io::empty()).unwrap_err();
        assert!(matches!(err, CatalogError::Deserialize(_)));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"))
        }
    }

    #[test]
    fn test_load_read_failure() {
        let err = Catalog::load(FailingReader).unwrap_err();
        assert!(matches!(err, CatalogError::Read(_)));
        assert!(err.is_deserialization());
    }

    #[test]
    fn test_store_output_is_stable() {
        let mut forward = Catalog::new();
        let mut reverse = Catalog::new();
        for entry in sample_entries() {
            forward.insert(entry);
        }
        for entry in sample_entries().into_iter().rev() {
            reverse.insert(entry);
        }

        let mut a = Vec::new();
        let mut b = Vec::new();
        forward.store(&mut a).unwrap();
        reverse.store(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stored_field_names() {
        let mut catalog = Catalog::new();
        catalog.insert(sample_entries().remove(0));

        let mut out = Vec::new();
        catalog.store(&mut out).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let awake = &doc["entries"]["awake"];
        assert_eq!(awake["origin"], "lines");
        assert_eq!(awake["project_name"], "awake");
        assert_eq!(awake["author"], "tehn");
        assert_eq!(awake["url"], "https://llllllll.co/t/awake/21022");
        assert_eq!(doc["file_info"]["kind"], "script_catalog");
    }
}

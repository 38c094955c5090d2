use std::fs;
use std::io::Write;
use tempfile::TempDir;

use localrag_core::config::{expand_path, resolve_with_base, Config};
use localrag_core::loader::DocumentLoader;
use localrag_core::traits::DocumentSource;
use localrag_core::types::DocType;
use localrag_core::Error;

#[test]
fn load_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let docs = DocumentLoader::new(dir).load().expect("load");

    assert_eq!(docs.len(), 1);
    let doc = &docs[0];
    assert_eq!(doc.content, "Short text", "content is trimmed");
    assert_eq!(doc.doc_type, DocType::Text);
    assert_eq!(doc.source, file_path.to_string_lossy());
    assert_eq!(doc.metadata.get("filename").and_then(|v| v.as_str()), Some("a.txt"));
    assert_eq!(doc.metadata.get("size").and_then(|v| v.as_u64()), Some(10));
}

#[test]
fn load_directory_recurses_sorts_and_filters_extensions() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("nested/deeper")).unwrap();
    fs::write(dir.join("b.txt"), "bravo").unwrap();
    fs::write(dir.join("nested/deeper/a.TXT"), "alpha").unwrap();
    fs::write(dir.join("notes.md"), "ignored markdown").unwrap();
    fs::write(dir.join("blank.txt"), "   \n  ").unwrap();

    let docs = DocumentLoader::new(dir).load_documents().expect("load");

    let contents: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
    assert_eq!(contents, vec!["bravo", "alpha"], "sorted by path, blank and unsupported files skipped");
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bytes.txt"), [b'o', b'k', 0xff, b'!']).unwrap();

    let docs = DocumentLoader::new(tmp.path()).load().expect("load");
    assert_eq!(docs.len(), 1);
    assert!(docs[0].content.starts_with("ok"));
}

#[test]
fn corrupt_binary_documents_are_skipped() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.pdf"), b"not a pdf").unwrap();
    fs::write(tmp.path().join("broken.docx"), b"not a zip").unwrap();
    fs::write(tmp.path().join("good.txt"), "still loaded").unwrap();

    let docs = DocumentLoader::new(tmp.path()).load().expect("per-file failures are not fatal");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content, "still loaded");
}

#[test]
fn missing_directory_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = DocumentLoader::new(tmp.path().join("nope")).load().unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
}

#[test]
fn config_defaults_match_documented_values() {
    let settings = Config::from_toml_str("").settings().expect("defaults are valid");
    assert_eq!(settings.chunking.chunk_size, 1000);
    assert_eq!(settings.chunking.chunk_overlap, 200);
    assert_eq!(settings.embedding.provider, "openai");
    assert_eq!(settings.embedding.dim, 1536);
    assert_eq!(settings.generation.model, "gpt-3.5-turbo");
    assert_eq!(settings.generation.max_tokens, 500);
    assert_eq!(settings.retrieval.top_k, 5);
    assert_eq!(settings.data.data_dir, "data");
}

#[test]
fn config_toml_overrides_nested_keys() {
    let config = Config::from_toml_str(
        r#"
        [chunking]
        chunk_size = 300
        chunk_overlap = 50

        [embedding]
        provider = "fake"
        dim = 64

        [embedding.endpoint]
        api_key = "sk-test"
        timeout_secs = 5
        "#,
    );
    let settings = config.settings().expect("settings");
    assert_eq!(settings.chunking.chunk_size, 300);
    assert_eq!(settings.embedding.provider, "fake");
    assert_eq!(settings.embedding.dim, 64);
    assert_eq!(settings.embedding.endpoint.api_key.as_deref(), Some("sk-test"));
    assert_eq!(settings.embedding.endpoint.timeout_secs, 5);
    assert_eq!(settings.embedding.model, "text-embedding-ada-002", "unset keys keep defaults");

    let top_k: usize = config.get("retrieval.top_k").expect("single key");
    assert_eq!(top_k, 5);
}

#[test]
fn config_rejects_zero_chunk_size() {
    let err = Config::from_toml_str("[chunking]\nchunk_size = 0\n").settings().unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn config_get_unknown_key_is_invalid_config() {
    let err = Config::from_toml_str("").get::<String>("does.not.exist").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn resolve_with_base_keeps_absolute_paths() {
    let base = std::path::Path::new("/srv/rag");
    assert_eq!(resolve_with_base(base, "docs"), base.join("docs"));
    let abs = if cfg!(windows) { "C:\\data" } else { "/data" };
    assert_eq!(resolve_with_base(base, abs), expand_path(abs));
}

#[test]
fn rebase_paths_anchors_relative_data_dir() {
    let base = std::path::Path::new("/etc/localrag");
    let mut settings = Config::from_toml_str("[data]\ndata_dir = \"corpus\"").settings().unwrap();
    settings.rebase_paths(base);
    assert_eq!(settings.data.data_dir(), base.join("corpus"));

    let abs = if cfg!(windows) { "C:\\corpus" } else { "/srv/corpus" };
    let mut settings = Config::from_toml_str(&format!("[data]\ndata_dir = '{abs}'")).settings().unwrap();
    settings.rebase_paths(base);
    assert_eq!(settings.data.data_dir(), std::path::PathBuf::from(abs));
}

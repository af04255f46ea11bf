use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use fwprov::{Error, FlashConfig, Ownership, Pipeline};
use fwprov_fetch::{Artifact, HttpClient, HttpResponse};

const BASE: &str = "https://releases.example.com/SM_ZYNQ_FW/releases";

#[derive(Debug, thiserror::Error)]
#[error("mock transport error: {0}")]
struct MockError(String);

#[derive(Default)]
struct MockClient {
    routes: HashMap<String, Bytes>,
    requests: Mutex<Vec<String>>,
}

impl MockClient {
    fn route(mut self, url: &str, body: impl Into<Bytes>) -> Self {
        self.routes.insert(url.to_string(), body.into());
        self
    }
}

impl HttpClient for MockClient {
    type Error = MockError;

    async fn get(&self, url: &str) -> Result<HttpResponse<MockError>, MockError> {
        self.requests.lock().unwrap().push(url.to_string());
        let Some(body) = self.routes.get(url).cloned() else {
            return Ok(HttpResponse {
                status: 404,
                content_length: Some(0),
                body: Box::pin(futures_util::stream::empty::<Result<Bytes, MockError>>()),
            });
        };
        // Two chunks so the accumulator is exercised.
        let split = body.len() / 2;
        let chunks: Vec<Result<Bytes, MockError>> = vec![Ok(body.slice(..split)), Ok(body.slice(split..))];
        Ok(HttpResponse {
            status: 200,
            content_length: Some(body.len() as u64),
            body: Box::pin(futures_util::stream::iter(chunks)),
        })
    }
}

/// Regular files only; `raw` names are written straight into the header.
fn tarball(files: &[(&str, &[u8])], raw: &[(&[u8], &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_mode(0o644);
        header.set_mtime(1_600_000_000);
        header.set_size(data.len() as u64);
        builder.append_data(&mut header, path, *data).unwrap();
    }
    for (name, data) in raw {
        let mut header = tar::Header::new_gnu();
        header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_mode(0o644);
        header.set_size(data.len() as u64);
        header.set_cksum();
        builder.append(&header, *data).unwrap();
    }

    let mut encoder = builder.into_inner().unwrap();
    encoder.flush().unwrap();
    encoder.finish().unwrap()
}

struct Fixture {
    _tmp: tempfile::TempDir,
    src: PathBuf,
    out: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempfile::Builder::new()
            .prefix("fwprov-test-pipeline-")
            .tempdir()
            .unwrap();
        let src = tmp.path().join("release");
        let out = tmp.path().join("sd");
        std::fs::create_dir(&src).unwrap();
        Self { _tmp: tmp, src, out }
    }

    fn stage(&self, boot: &[u8], image: &[u8], archive: &[u8]) {
        std::fs::write(self.src.join("BOOT.BIN"), boot).unwrap();
        std::fs::write(self.src.join("image.ub"), image).unwrap();
        std::fs::write(self.src.join("SD_p2.tar.gz"), archive).unwrap();
    }

    /// Boot and archive from the directory, image by explicit file path.
    fn config(&self) -> FlashConfig {
        FlashConfig {
            boot: self.src.display().to_string(),
            image: self.src.join("image.ub").display().to_string(),
            tar: self.src.display().to_string(),
            dir: self.out.clone(),
            ownership: Ownership::Never,
            ..FlashConfig::default()
        }
    }
}

fn local_pipeline() -> Pipeline<MockClient> {
    Pipeline::new(MockClient::default())
}

fn read(path: impl AsRef<Path>) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

#[tokio::test]
async fn local_sources_are_reproduced_byte_for_byte() {
    let fx = Fixture::new();
    let archive = tarball(&[("etc/hostname", b"zynq\n"), ("opt/readme", b"overlay")], &[]);
    fx.stage(b"\x00boot loader\xff", b"kernel image bytes", &archive);

    let summary = local_pipeline().run(&fx.config()).await.unwrap();

    assert_eq!(summary.firmware.boot, fx.out.join("firmware/BOOT.BIN"));
    assert_eq!(read(fx.out.join("firmware/BOOT.BIN")), b"\x00boot loader\xff");
    assert_eq!(read(fx.out.join("firmware/image.ub")), b"kernel image bytes");
    assert_eq!(read(fx.out.join("etc/hostname")), b"zynq\n");
    assert_eq!(read(fx.out.join("opt/readme")), b"overlay");
    assert_eq!(summary.archive.entry_count, 2);
    assert!(summary.archive.skipped.is_empty());
}

#[tokio::test]
async fn rerun_overwrites_previous_output() {
    let fx = Fixture::new();
    fx.stage(b"old boot", b"old kernel", &tarball(&[("etc/hostname", b"old\n")], &[]));
    local_pipeline().run(&fx.config()).await.unwrap();

    fx.stage(b"new boot", b"new kernel", &tarball(&[("etc/hostname", b"new\n")], &[]));
    let summary = local_pipeline().run(&fx.config()).await.unwrap();

    assert_eq!(read(fx.out.join("firmware/BOOT.BIN")), b"new boot");
    assert_eq!(read(fx.out.join("firmware/image.ub")), b"new kernel");
    assert_eq!(read(fx.out.join("etc/hostname")), b"new\n");
    assert_eq!(summary.archive.replaced_count(), 1);

    let names: Vec<_> = std::fs::read_dir(fx.out.join("etc"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, ["hostname"]);
}

#[tokio::test]
async fn missing_local_source_aborts_before_writing() {
    for artifact in Artifact::ALL {
        let fx = Fixture::new();
        fx.stage(b"boot", b"kernel", &tarball(&[("etc/hostname", b"zynq\n")], &[]));

        let mut config = fx.config();
        let missing = fx.src.join("does-not-exist").display().to_string();
        match artifact {
            Artifact::Boot => config.boot = missing,
            Artifact::Image => config.image = missing,
            Artifact::Archive => config.tar = missing,
        }

        let err = local_pipeline().run(&config).await.unwrap_err();
        match err {
            Error::Resolve { artifact: failed, source } => {
                assert_eq!(failed, artifact);
                assert!(source.is_invalid_source(), "{source}");
            }
            other => panic!("unexpected error for {artifact}: {other}"),
        }
        assert!(!fx.out.exists(), "output touched after {artifact} failed");
    }
}

#[tokio::test]
async fn remote_release_request_paths() {
    let fx = Fixture::new();
    let archive = tarball(&[("etc/hostname", b"remote\n")], &[]);
    let client = MockClient::default()
        .route(&format!("{BASE}/download/v9.9.9/BOOT.BIN"), &b"remote boot"[..])
        .route(&format!("{BASE}/download/v9.9.9/image.ub"), &b"remote kernel"[..])
        .route(&format!("{BASE}/download/v9.9.9/SD_p2.tar.gz"), archive);

    let config = FlashConfig {
        boot: BASE.to_string(),
        image: BASE.to_string(),
        tar: format!("{BASE}/"),
        version: "9.9.9".to_string(),
        dir: fx.out.clone(),
        ownership: Ownership::Never,
        ..FlashConfig::default()
    };

    let pipeline = Pipeline::new(client);
    pipeline.run(&config).await.unwrap();

    let requests = pipeline.resolver().client().requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        [
            format!("{BASE}/download/v9.9.9/BOOT.BIN"),
            format!("{BASE}/download/v9.9.9/image.ub"),
            format!("{BASE}/download/v9.9.9/SD_p2.tar.gz"),
        ]
    );
    assert_eq!(read(fx.out.join("firmware/BOOT.BIN")), b"remote boot");
    assert_eq!(read(fx.out.join("etc/hostname")), b"remote\n");
}

#[tokio::test]
async fn remote_variant_applies_to_images_only() {
    let fx = Fixture::new();
    let client = MockClient::default()
        .route(&format!("{BASE}/download/v1.4.2/BOOT.BIN.rev1"), &b"b"[..])
        .route(&format!("{BASE}/download/v1.4.2/image.ub.rev1"), &b"i"[..])
        .route(
            &format!("{BASE}/download/v1.4.2/SD_p2.tar.gz"),
            tarball(&[("etc/hostname", b"rev1\n")], &[]),
        );

    let config = FlashConfig {
        boot: BASE.to_string(),
        image: BASE.to_string(),
        tar: BASE.to_string(),
        version: "v1.4.2".to_string(),
        variant: Some("rev1".to_string()),
        dir: fx.out.clone(),
        ownership: Ownership::Never,
        ..FlashConfig::default()
    };

    Pipeline::new(client).run(&config).await.unwrap();
    assert_eq!(read(fx.out.join("firmware/BOOT.BIN")), b"b");
    assert_eq!(read(fx.out.join("firmware/image.ub")), b"i");
}

#[tokio::test]
async fn http_error_aborts_before_writing() {
    let fx = Fixture::new();
    let client = MockClient::default()
        .route(&format!("{BASE}/download/v9.9.9/BOOT.BIN"), &b"boot"[..]);

    let config = FlashConfig {
        boot: BASE.to_string(),
        image: BASE.to_string(),
        tar: BASE.to_string(),
        version: "9.9.9".to_string(),
        dir: fx.out.clone(),
        ..FlashConfig::default()
    };

    let err = Pipeline::new(client).run(&config).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Resolve { artifact: Artifact::Image, ref source } if source.is_transfer_failure()
    ));
    assert!(!fx.out.exists());
}

#[tokio::test]
async fn archive_entries_stay_inside_output_dir() {
    let fx = Fixture::new();
    let archive = tarball(&[("etc/hostname", b"zynq\n")], &[(b"../escape.txt", b"evil")]);
    fx.stage(b"boot", b"kernel", &archive);

    let err = local_pipeline().run(&fx.config()).await.unwrap_err();
    assert!(matches!(err, Error::Expand(fwprov_archive::Error::PathEscape { .. })));
    assert!(!fx.out.parent().unwrap().join("escape.txt").exists());
    assert_eq!(read(fx.out.join("etc/hostname")), b"zynq\n");
}

#[tokio::test]
async fn skip_bad_entries_keeps_going() {
    let fx = Fixture::new();
    let archive = tarball(
        &[("etc/hostname", b"zynq\n")],
        &[(b"../escape.txt", b"evil")],
    );
    fx.stage(b"boot", b"kernel", &archive);

    let config = FlashConfig {
        skip_bad_entries: true,
        ..fx.config()
    };
    let summary = local_pipeline().run(&config).await.unwrap();

    assert_eq!(summary.archive.entry_count, 1);
    assert_eq!(summary.archive.skipped.len(), 1);
    assert!(!fx.out.parent().unwrap().join("escape.txt").exists());
}

#[tokio::test]
async fn extract_options_override_reports_each_entry() {
    let fx = Fixture::new();
    let archive = tarball(&[("etc/hostname", b"zynq\n"), ("opt/readme", b"overlay")], &[]);
    fx.stage(b"boot", b"kernel", &archive);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let options = fx
        .config()
        .extract_options()
        .on_progress(Arc::new(move |p: fwprov_archive::Progress| {
            sink.lock().unwrap().push(p.entries_processed);
        }));

    let summary = local_pipeline()
        .extract_options(options)
        .run(&fx.config())
        .await
        .unwrap();

    assert_eq!(summary.archive.entry_count, 2);
    assert_eq!(*seen.lock().unwrap(), [1, 2]);
}

use pdf_imposition::*;

#[test]
fn test_booklet_defaults() {
    let config = ImpositionConfig::booklet(4, "papersize:A5").unwrap();
    assert_eq!(config.kind, LayoutKind::Booklet);
    assert_eq!(config.binding, Binding::Long);
    assert_eq!(config.paper.dimensions(), (420.0, 595.0));
    assert_eq!((config.grid.cols, config.grid.rows), (2, 2));
    assert_eq!(config.margin, 0.0);
    assert_eq!(config.border, None);
    assert_eq!(config.scaling, ScalingMode::Fit);
    assert!(!config.multi_folio);
    assert_eq!(config.folio_size, 8);
}

#[test]
fn test_topfold_grid_is_wide() {
    let config = ImpositionConfig::booklet(8, "papersize:A3, btype:booklet-topfold").unwrap();
    assert_eq!(config.kind, LayoutKind::BookletTopfold);
    assert_eq!((config.grid.cols, config.grid.rows), (4, 2));

    let config = ImpositionConfig::booklet(8, "papersize:A3").unwrap();
    assert_eq!((config.grid.cols, config.grid.rows), (2, 4));
}

#[test]
fn test_build_picks_kind_from_btype() {
    let plain = ImpositionConfig::build(9, "papersize:Letter").unwrap();
    assert_eq!(plain.kind, LayoutKind::PlainNUp);
    assert_eq!((plain.grid.cols, plain.grid.rows), (3, 3));

    let booklet = ImpositionConfig::build(4, "papersize:Letter, btype:booklet").unwrap();
    assert_eq!(booklet.kind, LayoutKind::Booklet);
}

#[test]
fn test_unknown_key_is_rejected() {
    let result = ImpositionConfig::booklet(4, "papersize:A5, colour:blue");
    match result {
        Err(ConfigError::InvalidOption(msg)) => assert!(msg.contains("colour")),
        other => panic!("Expected InvalidOption, got {other:?}"),
    }
}

#[test]
fn test_invalid_values_are_rejected() {
    for options in [
        "papersize:A99",
        "papersize:A5, binding:diagonal",
        "papersize:A5, btype:pamphlet",
        "papersize:A5, orientation:sideways",
        "papersize:A5, margin:-1",
        "papersize:A5, border:thick",
        "papersize:A5, multifolio:maybe",
        "papersize:A5, multifolio:on, foliosize:0",
        "papersize:A5, scaling:zoom",
        "dimensions:100",
        "papersize A5",
    ] {
        assert!(
            matches!(
                ImpositionConfig::booklet(4, options),
                Err(ConfigError::InvalidOption(_))
            ),
            "{options} should be rejected"
        );
    }
}

#[test]
fn test_missing_paper_size() {
    assert_eq!(
        ImpositionConfig::booklet(4, "binding:short"),
        Err(ConfigError::MissingPaperSize)
    );
}

#[test]
fn test_unsupported_booklet_nup() {
    for n in [3, 5, 9, 12, 16] {
        assert_eq!(
            ImpositionConfig::booklet(n, "papersize:A4"),
            Err(ConfigError::UnsupportedNUp {
                n,
                kind: LayoutKind::Booklet
            })
        );
    }
    assert!(matches!(
        ImpositionConfig::booklet(10, "papersize:A4, btype:booklet-topfold"),
        Err(ConfigError::UnsupportedNUp {
            kind: LayoutKind::BookletTopfold,
            ..
        })
    ));
}

#[test]
fn test_unsupported_plain_nup() {
    assert!(matches!(
        ImpositionConfig::nup(5, "papersize:A4"),
        Err(ConfigError::InvalidOption(_))
    ));
}

#[test]
fn test_nup_rejects_booklet_keys() {
    assert!(ImpositionConfig::nup(4, "papersize:A4, btype:booklet").is_err());
    assert!(ImpositionConfig::nup(4, "papersize:A4, multifolio:on").is_err());
}

#[test]
fn test_dimensions_with_units() {
    let config = ImpositionConfig::nup(2, "dimensions:400 600").unwrap();
    assert_eq!(config.paper.dimensions(), (400.0, 600.0));

    let config = ImpositionConfig::nup(2, "dimensions:8.5 11, unit:in").unwrap();
    assert_eq!(config.paper.dimensions(), (612.0, 792.0));

    let config = ImpositionConfig::nup(2, "unit:mm, dimensions:210 297, margin:10").unwrap();
    assert!((config.paper.width - 595.28).abs() < 0.01);
    assert!((config.margin - 28.35).abs() < 0.01);
}

#[test]
fn test_supplemented_keys() {
    let config = ImpositionConfig::nup(
        4,
        "papersize:A4, order:dl, enforce:off, scaling:stretch, border:2, margin:3",
    )
    .unwrap();
    assert_eq!(config.cell_order, CellOrder::DownLeft);
    assert!(!config.enforce_orientation);
    assert_eq!(config.scaling, ScalingMode::Stretch);
    assert_eq!(config.border, Some(2.0));
    assert_eq!(config.cell_inset(), 5.0);
}

#[test]
fn test_validate_detects_tampering() {
    let mut config = ImpositionConfig::booklet(4, "papersize:A5").unwrap();
    assert!(config.validate().is_ok());

    config.n = 6;
    assert!(config.validate().is_err());

    let mut config = ImpositionConfig::booklet(4, "papersize:A5").unwrap();
    config.margin = f32::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_error_converts_into_impose_error() {
    let err: ImposeError = ConfigError::MissingPaperSize.into();
    assert!(matches!(err, ImposeError::Config(ConfigError::MissingPaperSize)));
    assert!(err.to_string().contains("papersize"));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_config() {
    use tempfile::NamedTempFile;

    let config = ImpositionConfig::booklet(
        6,
        "papersize:A4L, binding:short, margin:4, border:on, multifolio:on, foliosize:3",
    )
    .unwrap();

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    config.save(path).await.unwrap();
    let loaded = ImpositionConfig::load(path).await.unwrap();

    assert_eq!(loaded, config);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_inconsistent_config() {
    use tempfile::NamedTempFile;

    let mut config = ImpositionConfig::booklet(4, "papersize:A5").unwrap();
    config.n = 8;

    let temp_file = NamedTempFile::new().unwrap();
    config.save(temp_file.path()).await.unwrap();

    let result = ImpositionConfig::load(temp_file.path()).await;
    assert!(matches!(result, Err(ImposeError::Config(_))));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_garbage() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), b"{ not json").await.unwrap();

    let result = ImpositionConfig::load(temp_file.path()).await;
    assert!(matches!(result, Err(ImposeError::Json(_))));
}

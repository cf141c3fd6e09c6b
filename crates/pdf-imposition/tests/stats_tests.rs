use pdf_imposition::*;

#[test]
fn test_stats_no_pages() {
    let config = ImpositionConfig::booklet(4, "papersize:A4").unwrap();

    let result = calculate_statistics(0, &config);
    match result {
        Err(ImposeError::NoPages) => {}
        _ => panic!("Expected NoPages error"),
    }
}

#[test]
fn test_stats_booklet_single_signature() {
    let config = ImpositionConfig::booklet(4, "papersize:A4").unwrap();

    let stats = calculate_statistics(10, &config).unwrap();

    assert_eq!(stats.source_pages, 10);
    // 10 pages padded to 16, a multiple of 8 pages per sheet
    assert_eq!(stats.blank_pages_added, 6);
    assert_eq!(stats.signatures, Some(1));
    assert_eq!(stats.pages_per_signature, Some(vec![16]));
    assert_eq!(stats.output_sheets, 2);
    // Front and back of each sheet
    assert_eq!(stats.output_pages, 4);
}

#[test]
fn test_stats_booklet_exact_fit() {
    let config = ImpositionConfig::booklet(6, "papersize:A4").unwrap();

    let stats = calculate_statistics(24, &config).unwrap();

    assert_eq!(stats.blank_pages_added, 0);
    assert_eq!(stats.output_sheets, 2);
    assert_eq!(stats.output_pages, 4);
}

#[test]
fn test_stats_multifolio() {
    let config =
        ImpositionConfig::booklet(2, "papersize:A4L, multifolio:on, foliosize:3").unwrap();

    let stats = calculate_statistics(30, &config).unwrap();

    // 30 pages padded to 32; 12 pages per signature
    assert_eq!(stats.blank_pages_added, 2);
    assert_eq!(stats.signatures, Some(3));
    assert_eq!(stats.pages_per_signature, Some(vec![12, 12, 8]));
    assert_eq!(stats.output_sheets, 8);
    assert_eq!(stats.output_pages, 16);
}

#[test]
fn test_stats_plain_nup() {
    let config = ImpositionConfig::nup(9, "papersize:A3").unwrap();

    let stats = calculate_statistics(20, &config).unwrap();

    assert_eq!(stats.source_pages, 20);
    assert_eq!(stats.blank_pages_added, 7);
    assert_eq!(stats.signatures, None);
    assert_eq!(stats.pages_per_signature, None);
    // One sheet side per output page
    assert_eq!(stats.output_sheets, 3);
    assert_eq!(stats.output_pages, 3);
}

#[test]
fn test_stats_match_page_order() {
    for (n, options) in [
        (4, "papersize:A4, btype:booklet-topfold"),
        (8, "papersize:A3, multifolio:on, foliosize:2"),
    ] {
        let config = ImpositionConfig::booklet(n, options).unwrap();
        for pages in [1usize, 7, 16, 33] {
            let stats = calculate_statistics(pages, &config).unwrap();
            let order = compute_page_order(pages as u32, &config);
            assert_eq!(order.len(), stats.output_pages * n);
            assert_eq!(
                order.iter().filter(|a| a.is_blank()).count(),
                stats.blank_pages_added
            );
        }
    }
}

use anyhow::Result;
use listing_cleaner::infra::SqliteSeenFingerprints;
use listing_cleaner::{clean_batch, clean_single, CleanerConfig, CleaningPipeline, RawRecord};
use std::sync::Arc;
use tempfile::tempdir;

fn house_in_dha() -> RawRecord {
    RawRecord {
        title: Some("5 Bed House in DHA Phase 6".to_string()),
        price_raw: Some("Rs. 1.5 Crore".to_string()),
        area_raw: Some("10 Marla".to_string()),
        city: Some("lahore".to_string()),
        area: Some("DHA Phase 6".to_string()),
        property_type: Some("Independent House".to_string()),
        source_website: Some("zameen.com".to_string()),
        ..RawRecord::default()
    }
}

fn flat_in_clifton() -> RawRecord {
    RawRecord {
        title: Some("Sea facing apartment".to_string()),
        price_raw: Some("45 Lakh".to_string()),
        area_raw: Some("1,200 sq ft".to_string()),
        city: Some("KHI".to_string()),
        area: Some("Clifton".to_string()),
        property_type: Some("Flat".to_string()),
        source_website: Some("graana.com".to_string()),
        ..RawRecord::default()
    }
}

/// Same listing as `house_in_dha`, written the way a second site formats it.
fn house_in_dha_reposted() -> RawRecord {
    RawRecord {
        title: Some("  5 Bed House in  DHA Phase 6 ".to_string()),
        price_raw: Some("PKR 15,000,000".to_string()),
        area_raw: Some("2722.5 Square Feet".to_string()),
        city: Some("Lahore".to_string()),
        area: Some("dha phase 6".to_string()),
        property_type: Some("bungalow".to_string()),
        source_website: Some("graana.com".to_string()),
        ..RawRecord::default()
    }
}

#[test]
fn test_batch_flags_later_copies_as_duplicates() {
    let batch = vec![house_in_dha(), flat_in_clifton(), house_in_dha_reposted()];
    let (cleaned, report) = clean_batch(&batch);

    let flags: Vec<bool> = cleaned.iter().map(|r| r.is_duplicate).collect();
    assert_eq!(flags, vec![false, false, true]);
    assert_eq!(cleaned[0].content_hash, cleaned[2].content_hash);
    assert_ne!(cleaned[0].content_hash, cleaned[1].content_hash);

    assert_eq!(report.processed_count, 3);
    assert_eq!(report.duplicate_count, 1);
    assert_eq!(report.unique_count, 2);
    assert_eq!(report.dedup_store_errors, 0);
}

#[test]
fn test_processing_order_decides_the_original() {
    let batch = vec![house_in_dha_reposted(), flat_in_clifton(), house_in_dha()];
    let (cleaned, _) = clean_batch(&batch);

    let flags: Vec<bool> = cleaned.iter().map(|r| r.is_duplicate).collect();
    assert_eq!(flags, vec![false, false, true]);
    assert_eq!(cleaned[0].source_website.as_deref(), Some("graana.com"));
}

#[test]
fn test_output_preserves_input_order_and_length() {
    let batch = vec![
        flat_in_clifton(),
        RawRecord::default(),
        house_in_dha(),
        house_in_dha(),
    ];
    let (cleaned, report) = clean_batch(&batch);

    assert_eq!(cleaned.len(), batch.len());
    assert_eq!(cleaned[0].title, "Sea facing apartment");
    assert_eq!(cleaned[2].title, "5 Bed House in DHA Phase 6");
    assert!(!cleaned[2].is_duplicate);
    assert!(cleaned[3].is_duplicate);
    assert_eq!(report.processed_count, 4);
}

#[test]
fn test_cleaned_fields_are_canonical() {
    let cleaned = clean_single(&house_in_dha());

    assert_eq!(cleaned.price_pkr, Some(15_000_000.0));
    assert_eq!(cleaned.area_size, Some(2722.5));
    assert_eq!(cleaned.area_unit_raw.as_deref(), Some("marla"));
    assert_eq!(cleaned.city, "Lahore");
    assert_eq!(cleaned.property_type, "House");
    assert_eq!(cleaned.content_hash.len(), 64);
    assert!(cleaned.content_hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(cleaned.data_quality_score, 0.76);
    assert_eq!(cleaned.price_raw.as_deref(), Some("Rs. 1.5 Crore"));
}

#[test]
fn test_fully_populated_record_scores_one() {
    let mut raw = house_in_dha();
    raw.bedrooms = Some("5".to_string());
    raw.bathrooms = Some("4 baths".to_string());
    raw.agent_name = Some("ayesha khan".to_string());
    raw.contact_phone = Some("+92 321 5550000".to_string());

    let cleaned = clean_single(&raw);
    assert_eq!(cleaned.data_quality_score, 1.0);
    assert_eq!(cleaned.agent_name.as_deref(), Some("Ayesha Khan"));
    assert_eq!(cleaned.contact_phone.as_deref(), Some("+923215550000"));
}

#[test]
fn test_garbage_input_never_fails() {
    let garbage = vec![
        RawRecord::default(),
        RawRecord {
            title: Some("!!!@@@###".to_string()),
            price_raw: Some("call for price".to_string()),
            area_raw: Some("huge".to_string()),
            city: Some("   ".to_string()),
            property_type: Some("spaceship".to_string()),
            bedrooms: Some("many".to_string()),
            date_posted: Some("yesterday".to_string()),
            ..RawRecord::default()
        },
        RawRecord {
            price_raw: Some("-5 lakh".to_string()),
            area_raw: Some("0 marla".to_string()),
            ..RawRecord::default()
        },
    ];

    let (cleaned, report) = clean_batch(&garbage);
    assert_eq!(cleaned.len(), 3);
    for record in &cleaned {
        assert!(record.price_pkr.is_none());
        assert!(record.area_size.is_none());
        assert!(record.price_per_sqft.is_none());
        assert_eq!(record.property_type, "Other");
        assert!((0.0..=1.0).contains(&record.data_quality_score));
    }
    assert_eq!(report.listable_count, 0);
}

#[test]
fn test_raw_records_deserialize_from_scraper_json() -> Result<()> {
    let payload = r#"[
        {"title": "Plot for sale", "price_raw": "2.5 crore", "area_raw": "1 Kanal",
         "city": "isb", "area": "F-7", "property_type": "Residential Plot",
         "source_website": "zameen.com", "listing_id": "z-991"},
        {"title": "Shop in Saddar", "price_raw": "50-60 Lakh", "area_raw": "200 sq yd",
         "city": "pindi", "property_type": "shop"}
    ]"#;
    let raws: Vec<RawRecord> = serde_json::from_str(payload)?;
    let (cleaned, _) = clean_batch(&raws);

    assert_eq!(cleaned[0].city, "Islamabad");
    assert_eq!(cleaned[0].property_type, "Plot");
    assert_eq!(cleaned[0].price_pkr, Some(25_000_000.0));
    assert_eq!(cleaned[0].area_size, Some(5445.0));
    assert_eq!(cleaned[0].listing_id.as_deref(), Some("z-991"));

    assert_eq!(cleaned[1].city, "Rawalpindi");
    assert_eq!(cleaned[1].property_type, "Commercial");
    assert_eq!(cleaned[1].price_pkr, Some(5_500_000.0));
    assert_eq!(cleaned[1].area_size, Some(1800.0));
    Ok(())
}

#[test]
fn test_sqlite_store_dedups_across_runs() -> Result<()> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("state").join("seen.db");
    let config = CleanerConfig::default();

    {
        let store = Arc::new(SqliteSeenFingerprints::open(&db_path)?);
        let pipeline = CleaningPipeline::new(&config, store);
        let (cleaned, _) = pipeline.clean_batch(&[house_in_dha(), flat_in_clifton()]);
        assert!(cleaned.iter().all(|r| !r.is_duplicate));
    }

    let store = Arc::new(SqliteSeenFingerprints::open(&db_path)?);
    let pipeline = CleaningPipeline::new(&config, store);
    let (cleaned, report) = pipeline.clean_batch(&[house_in_dha_reposted()]);
    assert!(cleaned[0].is_duplicate);
    assert_eq!(report.duplicate_count, 1);
    Ok(())
}

#[test]
fn test_pipeline_from_config_uses_sqlite_path() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = CleanerConfig {
        seen_db_path: Some(temp_dir.path().join("seen.db")),
        ..CleanerConfig::default()
    };

    let first = CleaningPipeline::from_config(&config)?;
    assert!(!first.clean_single(&flat_in_clifton()).is_duplicate);
    drop(first);

    let second = CleaningPipeline::from_config(&config)?;
    assert!(second.clean_single(&flat_in_clifton()).is_duplicate);
    Ok(())
}

#[test]
fn test_cleaning_is_idempotent_across_independent_scopes() {
    let first = clean_single(&flat_in_clifton());
    let second = clean_single(&flat_in_clifton());

    assert_eq!(first.content_hash, second.content_hash);
    assert_eq!(first.price_pkr, second.price_pkr);
    assert_eq!(first.data_quality_score, second.data_quality_score);
    assert!(!second.is_duplicate);
}

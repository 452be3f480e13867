/// Demo: clean a small mixed-source batch and print the cleaning report.
/// Raw listing → normalize (price, area, text) → fingerprint/dedup → quality score
use anyhow::Context;
use listing_cleaner::{observability, CleanerConfig, CleaningPipeline, RawRecord};

fn listing(
    source: &str,
    title: &str,
    price: &str,
    area_raw: &str,
    city: &str,
    area: &str,
    property_type: &str,
) -> RawRecord {
    RawRecord {
        title: Some(title.to_string()),
        price_raw: Some(price.to_string()),
        area_raw: Some(area_raw.to_string()),
        city: Some(city.to_string()),
        area: Some(area.to_string()),
        property_type: Some(property_type.to_string()),
        source_website: Some(source.to_string()),
        ..RawRecord::default()
    }
}

fn sample_batch() -> Vec<RawRecord> {
    let mut with_contact = listing(
        "zameen.com",
        "4 Bed House in DHA, Karachi",
        "Rs. 1.5 Crore",
        "10 Marla",
        "karachi",
        "dha",
        "Independent House",
    );
    with_contact.bedrooms = Some("4 Beds".to_string());
    with_contact.bathrooms = Some("3".to_string());
    with_contact.agent_name = Some("ali raza".to_string());
    with_contact.contact_phone = Some("+92 300-1234567".to_string());
    with_contact.date_posted = Some("2024-03-15".to_string());

    vec![
        with_contact,
        listing(
            "graana.com",
            "Apartment in Clifton",
            "45 Lakh",
            "1,200 sq. ft.",
            "KHI",
            "Clifton",
            "Flat",
        ),
        listing(
            "zameen.com",
            "Plot in F-7",
            "2.5 crore",
            "1 Kanal",
            "isb",
            "F-7",
            "Residential Plot",
        ),
        // Same DHA house as the first record, formatted the way another site does it
        listing(
            "graana.com",
            "4 Bed  House in DHA, Karachi",
            "PKR 15,000,000",
            "2722.5 Square Feet",
            "Karachi",
            "DHA",
            "bungalow",
        ),
        listing(
            "zameen.com",
            "Shop in Saddar",
            "50-60 Lakh",
            "200 sq yd",
            "pindi",
            "Saddar",
            "shop",
        ),
        listing("graana.com", "Call for details", "On request", "", "Lahore", "", ""),
    ]
}

fn main() -> anyhow::Result<()> {
    observability::init_logging();
    observability::metrics::init();

    let config = CleanerConfig::load().context("loading cleaner config")?;
    let pipeline = CleaningPipeline::from_config(&config).context("building cleaning pipeline")?;

    println!("\n🧹 LISTING CLEANING DEMO");
    println!("{}", "=".repeat(60));

    let (cleaned, report) = pipeline.clean_batch(&sample_batch());

    for record in &cleaned {
        println!(
            "{} {:<32} price={:<12} area={:<10} city={:<10} type={:<10} score={:.2}",
            if record.is_duplicate { "🔁" } else { "✅" },
            record.title,
            record.price_pkr.map(|p| format!("{:.0}", p)).unwrap_or_else(|| "-".to_string()),
            record.area_size.map(|a| format!("{:.1}", a)).unwrap_or_else(|| "-".to_string()),
            record.city,
            record.property_type,
            record.data_quality_score,
        );
    }

    println!("\n📊 Cleaning report:");
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(rendered) = observability::metrics::render() {
        println!("\n📈 Metrics:\n{}", rendered);
    }

    Ok(())
}

use page_packer_core::config::{FreeRectChoice, PackerConfig, PageSize, SortOrder};
use page_packer_core::error::PackError;
use page_packer_core::{Item, pack, pack_items};

#[test]
fn test_zero_width() {
    let cfg = PackerConfig {
        page_width: 0,
        page_height: 841,
        ..Default::default()
    };

    match cfg.validate() {
        Err(PackError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 0);
            assert_eq!(height, 841);
        }
        other => panic!("Expected InvalidDimensions error, got {other:?}"),
    }
}

#[test]
fn test_margin_exceeds_height() {
    let cfg = PackerConfig {
        page_width: 595,
        page_height: 30,
        margin: 20,
        ..Default::default()
    };

    assert_eq!(
        cfg.validate(),
        Err(PackError::MarginTooLarge {
            margin: 20,
            width: 595,
            height: 30
        })
    );
}

#[test]
fn test_margin_leaves_exactly_no_space() {
    // 2 * 50 = 100 leaves a zero-width interior
    let cfg = PackerConfig {
        page_width: 100,
        page_height: 300,
        margin: 50,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_pack_surfaces_config_failure() {
    let result = pack(vec![Item::new("a", 10.0, 10.0)], 30, 300, 20);
    assert!(matches!(result, Err(PackError::MarginTooLarge { .. })));

    let cfg = PackerConfig {
        page_width: 0,
        page_height: 0,
        ..Default::default()
    };
    let result = pack_items(Vec::<Item<String>>::new(), &cfg);
    assert!(matches!(result, Err(PackError::InvalidDimensions { .. })));
}

#[test]
fn test_zero_margin_is_valid() {
    let cfg = PackerConfig::builder()
        .with_page_dimensions(1, 1)
        .margin(0)
        .build();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.usable_size(), (1, 1));
}

#[test]
fn test_defaults_are_a4_with_margin_20() {
    let cfg = PackerConfig::default();
    assert_eq!((cfg.page_width, cfg.page_height), PageSize::A4.dimensions());
    assert_eq!(cfg.margin, 20);
    assert_eq!(cfg.sort_order, SortOrder::AreaDesc);
    assert_eq!(cfg.choice, FreeRectChoice::BestAreaFit);
    assert_eq!(cfg.usable_size(), (555, 801));
}

#[test]
fn test_enum_parsing() {
    assert_eq!("Letter".parse::<PageSize>(), Ok(PageSize::Letter));
    assert_eq!("bssf".parse::<FreeRectChoice>(), Ok(FreeRectChoice::BestShortSideFit));
    assert_eq!(
        "BestLongSideFit".parse::<FreeRectChoice>(),
        Ok(FreeRectChoice::BestLongSideFit)
    );
    assert_eq!("max_side_desc".parse::<SortOrder>(), Ok(SortOrder::MaxSideDesc));
    assert!(matches!(
        "tabloid".parse::<PageSize>(),
        Err(PackError::InvalidConfig(msg)) if msg.contains("tabloid")
    ));
}

#[test]
fn test_config_serde_defaults() {
    let cfg: PackerConfig =
        serde_json::from_str(r#"{"page_width": 612, "page_height": 792, "margin": 10}"#)
            .expect("parse");
    assert_eq!(cfg.sort_order, SortOrder::AreaDesc);
    assert_eq!(cfg.choice, FreeRectChoice::BestAreaFit);
    let back = serde_json::to_value(&cfg).expect("json");
    assert_eq!(back["sort_order"], "area_desc");
    assert_eq!(back["choice"], "bestareafit");
}

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["placecache-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_places_with_negative_longitude_and_defaults() {
    let cli = Cli::try_parse_from([
        "placecache-cli",
        "places",
        "--lat",
        "33.749",
        "--lng",
        "-84.388",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Places {
            lat,
            lng,
            radius,
            category,
            mode,
        }) => {
            assert!((lat - 33.749).abs() < 1e-9);
            assert!((lng + 84.388).abs() < 1e-9);
            assert_eq!(radius, None);
            assert_eq!(category, None);
            assert_eq!(mode, QueryMode::FoodAndRetail);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_places_retailer_mode_and_category() {
    let cli = Cli::try_parse_from([
        "placecache-cli",
        "places",
        "--lat",
        "35.2",
        "--lng",
        "-80.8",
        "--radius",
        "1500",
        "--category",
        "supermarket",
        "--mode",
        "grocery-only",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Places {
            radius: Some(1500),
            category: Some(ref c),
            mode: QueryMode::RetailerOnly,
            ..
        }) if c == "supermarket"
    ));
}

#[test]
fn rejects_unknown_mode() {
    let result = Cli::try_parse_from([
        "placecache-cli",
        "places",
        "--lat",
        "1",
        "--lng",
        "1",
        "--mode",
        "everything",
    ]);
    assert!(result.is_err());
}

#[test]
fn places_requires_coordinates() {
    assert!(Cli::try_parse_from(["placecache-cli", "places", "--lat", "1"]).is_err());
}

#[test]
fn parses_directions_with_unit() {
    let cli = Cli::try_parse_from([
        "placecache-cli",
        "directions",
        "--origin-lat",
        "33.749",
        "--origin-lng",
        "-84.388",
        "--dest-lat",
        "35.227",
        "--dest-lng",
        "-80.843",
        "--unit",
        "mi",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Directions {
            unit: DistanceUnit::Miles,
            ..
        })
    ));
}

#[test]
fn directions_unit_defaults_to_meters() {
    let cli = Cli::try_parse_from([
        "placecache-cli",
        "directions",
        "--origin-lat",
        "0",
        "--origin-lng",
        "0",
        "--dest-lat",
        "1",
        "--dest-lng",
        "1",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Directions {
            unit: DistanceUnit::Meters,
            ..
        })
    ));
}

#[test]
fn parses_store_ping_command() {
    let cli =
        Cli::try_parse_from(["placecache-cli", "store", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Store {
            command: StoreCommands::Ping
        })
    ));
}

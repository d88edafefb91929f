use factor_x_pricing::config::PricingConfig;
use factor_x_pricing::data::{DataLoader, FileIdentity, LoaderError};
use factor_x_pricing::export::CsvExporter;
use factor_x_pricing::pricing::{BandPosition, ModelParams, PricingError, PricingModel};
use std::collections::BTreeSet;
use std::path::PathBuf;

const ESTADO_MASTER: &str = "\
Region,Estado,Leads_estimados,Conversion_%
Centro,Ciudad de México,12000,3.1%
Occidente,Jalisco,8000,12%
Noreste,Nuevo León,6000,2.4%
Sur,Oaxaca,1000,3%
Sureste,Yucatán,2500,\"45,0\"
";

fn model() -> PricingModel {
    let df = DataLoader::parse_csv_bytes(ESTADO_MASTER.as_bytes()).unwrap();
    PricingModel::new(df, &PricingConfig::default()).unwrap()
}

fn params(states: &[&str]) -> ModelParams {
    ModelParams {
        ideal_price: 1800.0,
        band_factor: 0.05,
        selected_states: states.iter().map(|s| s.to_string()).collect(),
    }
}

fn temp_csv(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("factor_x_{}_{}.csv", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn normalized_rates_stay_within_threshold() {
    let model = model();
    for record in model.records() {
        assert!(record.conversion_pct <= 5.0, "{} not normalized", record.state);
    }

    let yucatan = model.records().iter().find(|r| r.state == "Yucatán").unwrap();
    assert!(yucatan.adjusted);
    assert!((yucatan.conversion_pct - 2.52).abs() < 1e-9);

    let cdmx = model.records().iter().find(|r| r.state == "Ciudad de México").unwrap();
    assert!(!cdmx.adjusted);
    assert_eq!(cdmx.conversion_pct, 3.1);
}

#[test]
fn kpis_follow_the_selection() {
    let model = model();
    let all: Vec<&str> = model.states().iter().map(|s| s.as_str()).collect();
    let everything = model.evaluate(&params(&all)).unwrap();
    let subset = model.evaluate(&params(&["Oaxaca", "Jalisco"])).unwrap();

    assert_eq!(everything.summary.total_leads, 29_500);
    assert_eq!(subset.summary.total_leads, 9_000);
    // Jalisco: round(8000 * 2.94%) = 235, Oaxaca: round(1000 * 3%) = 30
    assert_eq!(subset.summary.total_converted, 265);
    assert_eq!(subset.summary.active_states, 2);
}

#[test]
fn deselecting_every_state_is_a_gate() {
    let err = model().evaluate(&params(&[])).unwrap_err();
    assert_eq!(err, PricingError::EmptySelection);
}

#[test]
fn simulating_twenty_percent_below_ideal() {
    let model = model();
    let evaluation = model.evaluate(&params(&["Oaxaca"])).unwrap();

    let sim = model.simulate(&evaluation, "Oaxaca", 1440.0).unwrap();
    assert_eq!(sim.position, BandPosition::Below);
    assert_eq!(sim.multiplier, 1.4);
    assert_eq!(sim.enrollments, 41);
    assert_eq!(sim.revenue, 59_040.0);

    // Same inputs, same answer
    assert_eq!(model.simulate(&evaluation, "Oaxaca", 1440.0).unwrap(), sim);
}

#[test]
fn simulating_at_ideal_price_is_neutral() {
    let model = model();
    let evaluation = model.evaluate(&params(&["Nuevo León"])).unwrap();
    let sim = model.simulate(&evaluation, "Nuevo León", 1800.0).unwrap();
    assert_eq!(sim.multiplier, 1.0);
    assert_eq!(sim.position, BandPosition::Within);
    assert_eq!(sim.enrollments, 144);
}

#[test]
fn zero_ideal_price_blocks_simulation_but_not_evaluation() {
    let model = model();
    let mut p = params(&["Oaxaca"]);
    p.ideal_price = 0.0;
    let evaluation = model.evaluate(&p).unwrap();
    assert_eq!(evaluation.band.low, 0.0);

    let err = model.simulate(&evaluation, "Oaxaca", 100.0).unwrap_err();
    assert_eq!(err, PricingError::ZeroIdealPrice);
}

#[test]
fn export_contains_selected_rows_and_pricing_columns() {
    let model = model();
    let evaluation = model.evaluate(&params(&["Jalisco", "Yucatán"])).unwrap();
    let mut df = model.export_frame(&evaluation).unwrap();

    let text = String::from_utf8(CsvExporter::to_csv_bytes(&mut df).unwrap()).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert_eq!(
        header,
        concat!(
            "Region,Estado,Leads_estimados,Conversion_Rate,Factor_regional,",
            "Leads_convertidos,Precio_Ideal,Banda_Baja,Banda_Alta"
        )
    );

    let states: BTreeSet<&str> = lines.map(|l| l.split(',').nth(1).unwrap()).collect();
    assert_eq!(states, BTreeSet::from(["Jalisco", "Yucatán"]));
}

#[test]
fn loading_the_same_file_twice_uses_the_cache() {
    let path = temp_csv("cache", ESTADO_MASTER);
    let mut loader = DataLoader::new();

    let rows = loader.load_csv(&path).unwrap().height();
    assert_eq!(rows, 5);
    assert_eq!(loader.get_file_path(), Some(&path));

    assert!(loader.is_cached(&FileIdentity::of(&path).unwrap()));
    assert_eq!(loader.load_csv(&path).unwrap().height(), 5);

    // A changed file must be read again
    std::fs::write(&path, format!("{ESTADO_MASTER}Golfo,Veracruz,3000,2.2%\n")).unwrap();
    let changed = FileIdentity::of(&path).unwrap();
    assert!(!loader.is_cached(&changed));
    assert_eq!(loader.load_csv(&path).unwrap().height(), 6);
    assert!(loader.is_cached(&changed));
    assert_eq!(loader.get_row_count(), 6);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn file_with_unparseable_conversion_fails_to_load() {
    let path = temp_csv(
        "bad",
        "Region,Estado,Leads_estimados,Conversion_%\nSur,Oaxaca,1000,tres%\n",
    );
    let err = DataLoader::new().load_csv(&path).unwrap_err();
    assert!(matches!(err, LoaderError::NonNumericConversion { .. }));
    std::fs::remove_file(&path).unwrap();
}

use std::fs;

const HEADER: &str = "Stock Symbol,Full Name,Current Price,Rank,52-Week Low,52-Week High";

/// An unrecognised risk label is not an error: the run proceeds with the
/// medium multiplier (0.2) and records the label as given.
#[test]
fn unknown_risk_label_runs_with_medium_multiplier() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("IT.csv"),
        format!("{HEADER}\nINFY,Infosys,1500.0,1,1181.0,1733.0\n"),
    )?;
    let out = dir.path().join("baskets.json");

    let mut cmd = assert_cmd::Command::cargo_bin("bkd-cli")?;
    cmd.args([
        "100000",
        "Unknown-Value",
        "--data-dir",
        dir.path().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--theme",
        "IT.csv",
    ]);
    cmd.assert().success();

    let baskets: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out)?)?;
    for b in baskets.as_array().unwrap() {
        assert_eq!(b["investment"].as_f64().unwrap(), 20_000.0);
        assert_eq!(b["risk"], "unknown-value");
    }
    Ok(())
}

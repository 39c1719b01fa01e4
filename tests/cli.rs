use std::{error::Error, fs, path::Path};

use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::tempdir;

const PNG_MAGIC: &[u8] = b"\x89PNG";

fn write_results(dir: &Path, rows: &[&str]) -> Result<std::path::PathBuf, Box<dyn Error>> {
    let path = dir.join("results.csv");
    let mut content = String::from("algorithm,n,distribution,time_ms\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content)?;
    Ok(path)
}

fn png_files(dir: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".png"))
        .collect();
    names.sort();
    Ok(names)
}

#[test]
fn test_single_distribution_creates_one_chart() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(
        temp_dir.path(),
        &[
            "merge_sort,100,random,1.2",
            "quick_sort,100,random,0.8",
            "merge_sort,200,random,2.5",
        ],
    )?;

    let output = cargo_bin_cmd!("sortplot").arg(&csv_path).output()?;
    assert!(
        output.status.success(),
        "Command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let chart = temp_dir.path().join("plot_random.png");
    assert!(chart.exists(), "plot_random.png should be next to the input");
    assert!(fs::read(&chart)?.starts_with(PNG_MAGIC));
    assert_eq!(png_files(temp_dir.path())?, ["plot_random.png"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Plot saved to plot_random.png"));

    Ok(())
}

#[test]
fn test_distribution_with_space_uses_underscore() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(
        temp_dir.path(),
        &[
            "merge_sort,100,random,1.2",
            "merge_sort,100,strictly ascending,0.3",
            "heap_sort,100,strictly ascending,0.5",
        ],
    )?;

    let output = cargo_bin_cmd!("sortplot").arg(&csv_path).output()?;
    assert!(
        output.status.success(),
        "Command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(
        png_files(temp_dir.path())?,
        ["plot_random.png", "plot_strictly_ascending.png"]
    );

    Ok(())
}

#[test]
fn test_defaults_to_results_csv_in_working_directory() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    write_results(temp_dir.path(), &["quick_sort,10,descending,0.1"])?;

    let output = cargo_bin_cmd!("sortplot")
        .current_dir(temp_dir.path())
        .output()?;
    assert!(
        output.status.success(),
        "Command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(temp_dir.path().join("plot_descending.png").exists());

    Ok(())
}

#[test]
fn test_output_directory_is_created_and_used() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(temp_dir.path(), &["merge_sort,100,random,1.2"])?;
    let out_dir = temp_dir.path().join("charts");

    let output = cargo_bin_cmd!("sortplot")
        .arg(&csv_path)
        .arg("--output")
        .arg(&out_dir)
        .arg("--width")
        .arg("320")
        .arg("--height")
        .arg("240")
        .output()?;
    assert!(
        output.status.success(),
        "Command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(out_dir.join("plot_random.png").exists());
    assert!(png_files(temp_dir.path())?.is_empty());

    Ok(())
}

#[test]
fn test_two_positional_arguments_is_a_usage_error() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(temp_dir.path(), &["merge_sort,100,random,1.2"])?;

    let output = cargo_bin_cmd!("sortplot")
        .arg(&csv_path)
        .arg(&csv_path)
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(png_files(temp_dir.path())?.is_empty());

    Ok(())
}

#[test]
fn test_missing_input_file_names_the_path() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let missing = temp_dir.path().join("does_not_exist.csv");

    let output = cargo_bin_cmd!("sortplot").arg(&missing).output()?;

    assert_eq!(output.status.code(), Some(1));
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(combined.contains("does_not_exist.csv"));
    assert!(png_files(temp_dir.path())?.is_empty());

    Ok(())
}

#[test]
fn test_invalid_row_fails_without_output() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(
        temp_dir.path(),
        &["merge_sort,100,random,1.2", "merge_sort,abc,random,1.3"],
    )?;

    let output = cargo_bin_cmd!("sortplot").arg(&csv_path).output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("abc"));
    assert!(png_files(temp_dir.path())?.is_empty());

    Ok(())
}

#[test]
fn test_header_only_input_succeeds() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(temp_dir.path(), &[])?;

    let output = cargo_bin_cmd!("sortplot").arg(&csv_path).output()?;

    assert!(output.status.success());
    assert!(png_files(temp_dir.path())?.is_empty());

    Ok(())
}

/// Width and height from the IHDR chunk, which always follows the 8-byte signature
fn png_dimensions(path: &Path) -> Result<(u32, u32), Box<dyn Error>> {
    let bytes = fs::read(path)?;
    assert!(bytes.starts_with(PNG_MAGIC), "{} is not a PNG", path.display());
    let width = u32::from_be_bytes(bytes[16..20].try_into()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into()?);
    Ok((width, height))
}

const TWO_DISTRIBUTIONS: &[&str] = &[
    "merge_sort,100,random,1.2",
    "merge_sort,100,strictly ascending,0.3",
];

#[test]
fn test_unwritable_chart_does_not_stop_the_others() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(temp_dir.path(), TWO_DISTRIBUTIONS)?;
    fs::create_dir(temp_dir.path().join("plot_random.png"))?;

    let output = cargo_bin_cmd!("sortplot").arg(&csv_path).output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(temp_dir.path().join("plot_strictly_ascending.png").is_file());
    assert!(temp_dir.path().join("plot_random.png").is_dir());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 of 2"), "missing failure summary: {stdout}");
    assert!(stdout.contains("Plot saved to plot_strictly_ascending.png"));

    Ok(())
}

#[test]
fn test_fail_fast_stops_at_first_unwritable_chart() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(temp_dir.path(), TWO_DISTRIBUTIONS)?;
    fs::create_dir(temp_dir.path().join("plot_random.png"))?;

    let output = cargo_bin_cmd!("sortplot")
        .arg(&csv_path)
        .arg("--fail-fast")
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!temp_dir.path().join("plot_strictly_ascending.png").exists());

    Ok(())
}

#[test]
fn test_cli_flags_override_config_file_and_environment() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(temp_dir.path(), &["merge_sort,100,random,1.2"])?;
    let config_dir = temp_dir.path().join("from_config");
    let cli_dir = temp_dir.path().join("from_cli");

    let config_path = temp_dir.path().join("sortplot.toml");
    fs::write(
        &config_path,
        format!(
            "[render]\nwidth = 800\nheight = 600\noutput_dir = {:?}\n",
            config_dir.to_string_lossy()
        ),
    )?;

    let output = cargo_bin_cmd!("sortplot")
        .env("SORTPLOT_RENDER__WIDTH", "500")
        .arg(&csv_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--output")
        .arg(&cli_dir)
        .arg("--width")
        .arg("320")
        .output()?;
    assert!(
        output.status.success(),
        "Command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let chart = cli_dir.join("plot_random.png");
    assert!(chart.exists(), "chart should land in the --output directory");
    assert!(!config_dir.join("plot_random.png").exists());

    // width from the CLI, height from the config file
    assert_eq!(png_dimensions(&chart)?, (320, 600));

    Ok(())
}

#[test]
fn test_environment_overrides_config_file_for_binary() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(temp_dir.path(), &["merge_sort,100,random,1.2"])?;
    let config_path = temp_dir.path().join("sortplot.toml");
    fs::write(&config_path, "[render]\nwidth = 800\nheight = 600\n")?;

    let output = cargo_bin_cmd!("sortplot")
        .env("SORTPLOT_RENDER__HEIGHT", "300")
        .arg(&csv_path)
        .arg("--config")
        .arg(&config_path)
        .output()?;
    assert!(
        output.status.success(),
        "Command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(
        png_dimensions(&temp_dir.path().join("plot_random.png"))?,
        (800, 300)
    );

    Ok(())
}

#[test]
fn test_existing_chart_is_overwritten() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(temp_dir.path(), &["merge_sort,100,random,1.2"])?;
    let chart = temp_dir.path().join("plot_random.png");
    fs::write(&chart, "stale")?;

    let output = cargo_bin_cmd!("sortplot").arg(&csv_path).output()?;
    assert!(output.status.success());
    assert!(fs::read(&chart)?.starts_with(PNG_MAGIC));

    Ok(())
}

#[test]
fn test_labels_sharing_a_file_name_warn_and_overwrite() -> Result<(), Box<dyn Error>> {
    let temp_dir = tempdir()?;
    let csv_path = write_results(
        temp_dir.path(),
        &["merge_sort,100,a b,1.2", "merge_sort,100,a\tb,0.7"],
    )?;

    let output = cargo_bin_cmd!("sortplot").arg(&csv_path).output()?;
    assert!(
        output.status.success(),
        "Command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(png_files(temp_dir.path())?, ["plot_a_b.png"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("already written"), "missing overwrite warning: {stdout}");

    Ok(())
}

//! End-to-end checks through the public API.

use serde_json::json;
use smokechart::prelude::*;

fn hourly_pings() -> RawMatrix {
    parse_matrix(
        r#"[
            [12, 14, 13, 90, 15, 13, 12, 14, null, 13],
            [],
            [20, 21, 22, 20, 23, 21, 20, 25, 24, 22],
            ["timeout", null, 30, 31]
        ]"#,
    )
    .unwrap()
}

#[test]
fn test_scene_on_screen_coordinates() {
    let chart = smoke()
        .size(400.0, 100.0)
        .error_radius(3.0)
        .instance_id("ping")
        .build(&hourly_pings())
        .unwrap();

    assert_eq!(chart.bucket_count(), 4);
    assert_eq!(chart.scale_x().unwrap().domain, [0.0, 4.0]);
    assert_eq!(chart.scale_y().unwrap().domain, [12.0, 90.0]);

    let scene = chart.scene(0.5).unwrap();
    assert_eq!(scene.bands.len(), 3);
    assert_eq!(scene.lines.len(), 1);
    // The empty second bucket splits the median line.
    assert_eq!(scene.lines[0].d.subpaths(), 2);
    // Buckets 0 and 3 lost samples, so two wedges.
    match &scene.errors {
        ErrorOutput::Path { path } => assert_eq!(path.d.subpaths(), 2),
        other => panic!("expected wedges, got {other:?}"),
    }

    let value = serde_json::to_value(&scene).unwrap();
    assert_eq!(value["mode"], json!("smoke"));
    assert_eq!(value["buckets"], json!(4));
    assert_eq!(value["errors"]["kind"], json!("path"));
    assert_eq!(
        value["lines"][0]["class"],
        json!("smokechart-line smokechart-line-ping")
    );
    assert!(value["bands"][0]["d"].as_str().unwrap().starts_with("M0,"));
}

#[test]
fn test_error_ratios_both_modes() {
    let raw = hourly_pings();
    let invalid = smoke().build(&raw).unwrap();
    assert_eq!(invalid.error_ratios(), vec![0.1, 0.0, 0.0, 0.5]);

    let shortfall = smoke()
        .error_mode(ErrorMode::Shortfall)
        .probe_count(10)
        .unscaled()
        .build(&raw)
        .unwrap();
    assert_eq!(shortfall.error_ratios(), vec![0.1, 1.0, 0.0, 0.8]);
    let markers = shortfall.shortfall_markers();
    assert_eq!(markers.len(), 1 + 10 + 8);
    assert_eq!(markers[0], ErrorMarker { x: 0.0, err_pos: 0 });
    assert_eq!(markers[1].x, 1.0);
    assert_eq!(markers[10].err_pos, 9);
}

#[test]
fn test_all_empty_matrix_keeps_y_domain() {
    let y = Scale::linear().with_domain(0.0, 50.0);
    let chart = smoke()
        .scale_y(y)
        .build(&[vec![f64::NAN], vec![]])
        .unwrap();
    assert_eq!(chart.scale_y().unwrap().domain, [0.0, 50.0]);
    assert_eq!(chart.scale_x().unwrap().domain, [0.0, 2.0]);
    assert!(chart.line_path(0.5).unwrap().is_empty());
}

#[test]
fn test_replace_data_drops_previous_geometry() {
    let mut chart = smoke().unscaled().bands(1).build(&[vec![1.0, 9.0]]).unwrap();
    assert_eq!(chart.band_paths().unwrap()[0].to_string(), "M0,1L0,9L1,9L1,1Z");
    chart.replace_data(&[vec![], vec![4.0]]);
    assert_eq!(chart.band_paths().unwrap()[0].to_string(), "M1,4L1,4L2,4L2,4Z");
    assert_eq!(chart.error_stats().len(), 2);
}

#[test]
fn test_invalid_quantile_fails_loudly() {
    let chart = smoke().build(&hourly_pings()).unwrap();
    for q in [-0.1, 1.01, f64::NAN] {
        let err = chart.line_path(q).unwrap_err();
        assert!(matches!(
            err.current_context(),
            SmokeError::InvalidQuantile(_)
        ));
        assert!(chart.scene(q).is_err());
    }
}

#[test]
fn test_band_layers_tessellate() {
    let chart = smoke()
        .size(200.0, 50.0)
        .build(&hourly_pings())
        .unwrap();
    for band in chart.band_paths().unwrap() {
        let mesh = fill_mesh(&band, DEFAULT_TOLERANCE).unwrap();
        // Three non-empty buckets, at least two triangles each.
        assert!(mesh.triangle_count() >= 6);
        assert_eq!(mesh.indices.len() % 3, 0);
    }
}

#[test]
fn test_config_json_round_trip_drives_chart() {
    let cfg: ChartConfig = serde_json::from_value(json!({
        "percentiles": [[0, 1]],
        "scale_x": null,
        "scale_y": null,
        "mode": "flame",
        "flame_lines": 2
    }))
    .unwrap();
    let chart = Smokechart::new(&[vec![10.0, 20.0, 30.0]], cfg).unwrap();
    let scene = chart.scene(0.5).unwrap();
    assert!(scene.bands.is_empty());
    let lines: Vec<String> = scene.lines.iter().map(|l| l.d.to_string()).collect();
    assert_eq!(lines, vec!["M0,20L1,20", "M0,25L1,25"]);
}

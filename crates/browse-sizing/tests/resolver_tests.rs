//! Output grid resolution against real source grids.

use browse_common::{Affine, Axis, BrowseError, Crs, Dimensions, ScaleExtent};
use browse_sizing::{
    best_guess_scale_extent, best_guess_target_dimensions, partition, resolve_grid,
    resolve_grid_with_sources, CrsSource, DimensionSource, ExtentSource, InputRasterMetadata,
    OutputGridRequest, ResolutionFamily, TilingConfig, METERS_PER_DEGREE,
};
use test_utils::{
    assert_approx_eq, assert_extent_approx_eq, extent, SourceGrid, EASE2_36KM, NP_SEAICE_25KM,
    SP_SEAICE_25KM,
};

fn input_from(grid: &SourceGrid) -> InputRasterMetadata {
    let [a, b, c, d, e, f] = grid.transform();
    InputRasterMetadata::new(
        grid.width,
        grid.height,
        Crs::from_epsg(grid.epsg).unwrap(),
        Affine::new(a, b, c, d, e, f),
    )
}

fn input_with(epsg: u32, width: u32, height: u32, transform: [f64; 6]) -> InputRasterMetadata {
    let [a, b, c, d, e, f] = transform;
    InputRasterMetadata::new(
        width,
        height,
        Crs::from_epsg(epsg).unwrap(),
        Affine::new(a, b, c, d, e, f),
    )
}

fn to_extent(bounds: (f64, f64, f64, f64)) -> ScaleExtent {
    ScaleExtent::new(bounds.0, bounds.1, bounds.2, bounds.3)
}

// ============================================================================
// resolve_grid
// ============================================================================

#[test]
fn test_complete_request_is_used_as_given() {
    let grid = NP_SEAICE_25KM;
    let request = OutputGridRequest::default()
        .with_crs(grid.crs_string())
        .with_dimensions(grid.width, grid.height)
        .with_scale_extent(to_extent(grid.bounds()))
        .with_scale_size(grid.xres, grid.yres);

    let resolved = resolve_grid(&request, &input_from(&SP_SEAICE_25KM)).unwrap();

    assert_eq!(resolved.width, 304);
    assert_eq!(resolved.height, 448);
    assert_eq!(resolved.crs.epsg(), Some(3413));
    assert_eq!(
        resolved.transform,
        Affine::translation(-3850000.0, 5850000.0) * Affine::scale(25000.0, -25000.0)
    );
}

#[test]
fn test_empty_request_on_preferred_crs_uses_icd_extent() {
    let resolution =
        resolve_grid_with_sources(&OutputGridRequest::default(), &input_from(&SP_SEAICE_25KM))
            .unwrap();
    let grid = resolution.grid;

    // 8388608 / 25000 = 335.54, rounded up
    assert_eq!(grid.dimensions(), Dimensions::new(336, 336));
    assert_eq!(grid.crs.epsg(), Some(3031));
    assert_eq!(resolution.dimension_source, DimensionSource::BestGuess);
    assert!(matches!(resolution.extent_source, ExtentSource::IcdStandard(_)));

    let resolution_m = 8388608.0 / 336.0;
    assert_eq!(
        grid.transform,
        Affine::translation(-4194304.0, 4194304.0) * Affine::scale(resolution_m, -resolution_m)
    );
}

#[test]
fn test_requested_extent_is_verbatim() {
    let requested = ScaleExtent::new(-1000.0, -2000.0, 3000.0, 500.0);
    let request = OutputGridRequest::default().with_scale_extent(requested);

    for source in [NP_SEAICE_25KM, SP_SEAICE_25KM, EASE2_36KM] {
        let resolution = resolve_grid_with_sources(&request, &input_from(&source)).unwrap();
        assert_eq!(resolution.scale_extent, requested);
        assert_eq!(resolution.extent_source, ExtentSource::Requested);
    }
}

#[test]
fn test_zero_dimensions_are_ignored() {
    let input = input_with(4326, 360, 180, [1.0, 0.0, -180.0, 0.0, -1.0, 90.0]);
    let zero = OutputGridRequest::default().with_dimensions(0, 0);

    let resolution = resolve_grid_with_sources(&zero, &input).unwrap();
    assert_eq!(resolution.dimension_source, DimensionSource::BestGuess);
    assert_eq!(
        resolution.grid,
        resolve_grid(&OutputGridRequest::default(), &input).unwrap()
    );

    let grid = resolution.grid;
    assert!(grid.width > 0 && grid.height > 0);
    assert!(grid.transform.a.is_finite() && grid.transform.a > 0.0);
    assert!(grid.transform.e.is_finite() && grid.transform.e < 0.0);
    assert_eq!((grid.transform.b, grid.transform.d), (0.0, 0.0));

    let tiled = partition(&grid, &TilingConfig::default());
    assert!(tiled.iter().all(|(tile, _)| tile.width > 0 && tile.height > 0));

    let one_zero = OutputGridRequest::default().with_dimensions(100, 0);
    assert_eq!(
        resolve_grid_with_sources(&one_zero, &input).unwrap().dimension_source,
        DimensionSource::BestGuess
    );
}

#[test]
fn test_utm_input_with_geographic_request() {
    let input: InputRasterMetadata = serde_json::from_str(
        r#"{
            "width": 3660,
            "height": 3660,
            "crs": "EPSG:32633",
            "transform": {"a": 30.0, "b": 0.0, "c": 399960.0, "d": 0.0, "e": -30.0, "f": 5000040.0}
        }"#,
    )
    .unwrap();
    assert_eq!(input.crs.epsg(), Some(32633));

    let request = OutputGridRequest::default().with_crs("EPSG:4326");
    let resolution = resolve_grid_with_sources(&request, &input).unwrap();

    assert_eq!(resolution.crs_source, CrsSource::Requested);
    assert_eq!(resolution.grid.crs.epsg(), Some(4326));
    assert_eq!(resolution.scale_extent, ScaleExtent::global());

    // 30m is 0.000264°, nearest the 0.000274658203125° entry
    let expected = ResolutionFamily::Global.table().entries()[1];
    assert_eq!(expected.pixel_size, 0.000274658203125);
    assert_eq!(resolution.grid.width, expected.width);
    assert_eq!(resolution.grid.height, expected.width / 2);
}

#[test]
fn test_utm_input_without_area_of_use_falls_back_to_globe() {
    let input = input_with(32633, 3660, 3660, [30.0, 0.0, 399960.0, 0.0, -30.0, 5000040.0]);
    let resolution = resolve_grid_with_sources(&OutputGridRequest::default(), &input).unwrap();

    assert_eq!(resolution.crs_source, CrsSource::Input);
    assert_eq!(resolution.extent_source, ExtentSource::Global);
    assert_eq!(resolution.scale_extent, ScaleExtent::global());
}

#[test]
fn test_projected_best_guess_extent() {
    // North Pole LAEA Canada
    let guess = best_guess_scale_extent(&Crs::from_epsg(3573).unwrap());
    assert_eq!(guess.source, ExtentSource::AreaOfUse);
    assert_extent_approx_eq!(
        guess.value,
        (-4859208.992805643, -4886873.230107171, 4859208.992805643, 4886873.230107171),
        0.01
    );
}

#[test]
fn test_height_only_matches_empty_request() {
    let input = input_from(&NP_SEAICE_25KM);
    let height_only = OutputGridRequest {
        height: Some(30),
        ..OutputGridRequest::default()
    };

    let with_height = resolve_grid(&height_only, &input).unwrap();
    let without = resolve_grid(&OutputGridRequest::default(), &input).unwrap();
    assert_eq!(with_height, without);
}

#[test]
fn test_inconsistent_request_is_rejected() {
    let request = OutputGridRequest::default()
        .with_crs("EPSG:4326")
        .with_dimensions(820, 180)
        .with_scale_extent(ScaleExtent::global())
        .with_scale_size(0.5, 1.0);

    let err = resolve_grid(&request, &input_from(&EASE2_36KM)).unwrap_err();
    match err {
        BrowseError::InconsistentDimension {
            axis,
            derived,
            requested,
            ..
        } => {
            assert_eq!(axis, Axis::X);
            assert_eq!(derived, 720);
            assert_eq!(requested, 820);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_uninterpretable_crs_is_rejected() {
    let request = OutputGridRequest::default().with_crs("not a crs");
    let err = resolve_grid(&request, &input_from(&EASE2_36KM)).unwrap_err();
    assert!(matches!(err, BrowseError::InvalidCrs(_)));
}

#[test]
fn test_proj4_request_resolves_to_preferred_crs() {
    let request = OutputGridRequest::default().with_crs(test_utils::crs::PROJ4_3413);
    let resolution = resolve_grid_with_sources(&request, &input_from(&NP_SEAICE_25KM)).unwrap();
    assert_eq!(resolution.grid.crs.epsg(), Some(3413));
    assert_eq!(resolution.scale_extent, to_extent(extent::POLAR_ICD));
}

#[test]
fn test_antimeridian_area_of_use_is_not_normalized() {
    let input = input_with(4269, 360, 180, [1.0, 0.0, -180.0, 0.0, -1.0, 90.0]);
    let resolution = resolve_grid_with_sources(&OutputGridRequest::default(), &input).unwrap();

    assert_eq!(resolution.extent_source, ExtentSource::AreaOfUse);
    assert_eq!(
        resolution.scale_extent,
        ScaleExtent::new(167.65, 14.92, -40.73, 86.45)
    );

    // |(-40.73) - 167.65| = 208.38 cells at the native 1°
    assert_eq!(resolution.grid.dimensions(), Dimensions::new(208, 72));
    assert!(resolution.grid.transform.a < 0.0);
    assert_eq!(resolution.grid.transform.c, 167.65);
}

// ============================================================================
// best_guess_target_dimensions
// ============================================================================

#[test]
fn test_coarse_projected_input_keeps_native_resolution() {
    let input = input_with(
        6931,
        720,
        720,
        [25000.0, 0.0, -9000000.0, 0.0, -25000.0, 9000000.0],
    );
    let target = Crs::from_epsg(6931).unwrap();

    let dims = best_guess_target_dimensions(&input, &to_extent(extent::EASE2_NORTH), &target);
    assert_eq!(dims, Dimensions::new(720, 720));
}

#[test]
fn test_fine_projected_input_snaps_to_table() {
    // 700m EASE-2 grid snaps to the 512m entry: 18000000 / 512 = 35156.25
    let input = input_with(
        6931,
        25714,
        25714,
        [699.980556095664, 0.0, -9000000.0, 0.0, 699.980556095664, 9000000.0],
    );
    let target = Crs::from_epsg(6931).unwrap();

    let dims = best_guess_target_dimensions(&input, &to_extent(extent::EASE2_NORTH), &target);
    assert_eq!(dims, Dimensions::new(35156, 35156));
}

#[test]
fn test_fine_projected_input_on_icd_extent_matches_table_width() {
    let input = input_with(
        3413,
        11983,
        11983,
        [700.0423, 0.0, -4194304.0, 0.0, 700.0423, 4194304.0],
    );
    let target = Crs::from_epsg(3413).unwrap();
    let icd = to_extent(extent::POLAR_ICD);

    let dims = best_guess_target_dimensions(&input, &icd, &target);

    let expected = ResolutionFamily::NorthPolar.table().entries()[5];
    assert_eq!(expected.pixel_size, 512.0);
    assert_eq!(dims, Dimensions::new(expected.width, expected.width));
    assert_approx_eq!(icd.x_range() / f64::from(dims.width), 512.0, 1e-9);
}

#[test]
fn test_coarse_meter_input_to_geographic_target() {
    let input = input_with(
        EASE2_36KM.epsg,
        EASE2_36KM.width,
        EASE2_36KM.height,
        EASE2_36KM.transform_from_bounds(EASE2_36KM.width, EASE2_36KM.height),
    );
    let target = Crs::from_epsg(4326).unwrap();

    let infile_res = 0.31668943359375;
    assert_approx_eq!(36032.22 / METERS_PER_DEGREE, infile_res, 1e-12);

    let dims = best_guess_target_dimensions(&input, &to_extent(extent::MID_LATITUDE), &target);
    assert_eq!(dims, Dimensions::new(1137, 543));
}

#[test]
fn test_fine_meter_input_to_geographic_target() {
    // 360m resolves to the 0.002197265625° ("250m") entry
    let width = EASE2_36KM.width * 100;
    let height = EASE2_36KM.height * 100;
    let input = input_with(
        EASE2_36KM.epsg,
        width,
        height,
        EASE2_36KM.transform_from_bounds(width, height),
    );
    let target = Crs::from_epsg(4326).unwrap();
    let mid_latitude = to_extent(extent::MID_LATITUDE);

    let dims = best_guess_target_dimensions(&input, &mid_latitude, &target);
    assert_eq!(dims, Dimensions::new(163840, 78279));
    assert_approx_eq!(
        mid_latitude.x_range() / f64::from(dims.width),
        0.002197265625,
        1e-12
    );
}

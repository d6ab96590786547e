use atlas_sheets::{
    AtlasError, Cell, CellSize, Grid5k, LogSink, Mdgid, MemoryProvider, PixelBox, Sheet,
    SheetConfig,
};
use geo_types::coord;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AtlasError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cell = Cell::builder()
        .mdgid(Mdgid::new("V795X16666", 0))
        .sw(40.0, -122.0)
        .ne(40.25, -121.75)
        .sheet("2242")
        .build()?;
    let base = Arc::new(MemoryProvider::new(CellSize::FiftyK, vec![cell])?);
    let grid5k = Arc::new(Grid5k::new(base)?);

    let mut config = SheetConfig::new("5k", "5k");
    config.scale = 5000;
    config.spacing = 100;
    let sheet = Sheet::new(config, grid5k)?;

    let plan = sheet.plan_for_lat_lng(40.21, -121.96, &LogSink::new("demo"))?;
    let cell = &plan.cell;
    println!("Sheet: {} ({})", cell.sheet_number(), cell.mdgid());
    println!("SW: {} {}", cell.sw_lat_dms(), cell.sw_lng_dms());
    println!("NE: {} {}", cell.ne_lat_dms(), cell.ne_lng_dms());
    println!("Zone: {}{}", cell.zone().label_or("01"), cell.hemi().as_str());
    println!("Zoom: {:.4}, ground: {:.4} m/px", plan.zoom, plan.ground);
    println!("Map: {:.0} x {:.0} px", plan.width_px, plan.height_px);

    let structure = &plan.structure;
    let pbx = PixelBox::new(
        coord! { x: 0.0, y: plan.height_px },
        coord! { x: plan.width_px, y: 0.0 },
        plan.ground,
    );
    structure.northing_bars(|idx, bar| -> Result<(), AtlasError> {
        let label = bar.label(structure.spacing);
        let line = pbx.bar_line(&bar);
        println!(
            "N{idx:02} {}{}{} ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            label.prefix_string(),
            label.label_string(),
            label.suffix_string(),
            line.start.x,
            line.start.y,
            line.end.x,
            line.end.y
        );
        Ok(())
    })?;
    println!("Easting bars: {}", structure.easting.count);

    Ok(())
}

use cute_layout::{
    composition, composition_by_mode, coordinate_grid, format_coord, lv, tile, CoordFormat, Grid,
    Layout, Result,
};

// Worked examples from
// https://docs.nvidia.com/cutlass/latest/media/docs/cpp/cute/02_layout_algebra.html

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .with_module_level("cute_layout", log::LevelFilter::Trace)
        .init()
        .unwrap();

    let a = Layout::new(lv!(6, 2), lv!(8, 2))?;
    let b = Layout::new(lv!(4, 3), lv!(3, 1))?;
    let r = composition(&a, &b)?;
    println!("{a} o {b} = {r}");

    // where each element of B lands in A's coordinate space
    let format = CoordFormat {
        collapse_singletons: true,
    };
    if let Grid::Matrix { cells, .. } = coordinate_grid(&b, a.shape())? {
        for row in cells {
            let row: Vec<_> = row.iter().map(|c| format_coord(c, format)).collect();
            println!("{}", row.join("  "));
        }
    }

    let a = Layout::new(lv!(12, lv!(4, 8)), lv!(59, lv!(13, 1)))?;
    let tiler = tile![Layout::new(lv!(3), lv!(4))?, Layout::new(lv!(8), lv!(2))?];
    println!("{a} o {tiler} = {}", composition_by_mode(&a, &tiler)?);

    Ok(())
}

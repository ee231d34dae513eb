use cute_layout::{lv, offset_grid, Grid, Layout, Result};

// Based on quick example in
// https://youtu.be/vzUhbDO_0qk?t=2160

fn render(layout: &Layout) -> Result<String> {
    let mut out = format!("{layout}\n");
    match offset_grid(layout)? {
        Grid::Matrix { rows, cols, cells } => {
            out += &format!("{:>8}", "");
            for col in &cols {
                out += &format!("{:>8}", col.to_string());
            }
            out += "\n";
            for (row, cells) in rows.iter().zip(&cells) {
                out += &format!("{:>8}", row.to_string());
                for cell in cells {
                    out += &format!("{cell:>8}");
                }
                out += "\n";
            }
        }
        Grid::Vector { cells, .. } => {
            for cell in cells {
                out += &format!("{cell:>4}");
            }
            out += "\n";
        }
    }
    Ok(out)
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .with_module_level("cute_layout", log::LevelFilter::Info)
        .init()
        .unwrap();

    // A 4x8 matrix, column-major
    let layout = Layout::compact(lv!(4, 8))?;
    println!("Column-major");
    println!("{}", render(&layout)?);

    let layout = Layout::new(lv!(4, 8), lv!(8, 1))?;
    println!("Row-major");
    println!("{}", render(&layout)?);

    let layout = Layout::new(lv!(4, 8), lv!(1, 5))?;
    println!("Column-major padded");
    println!("{}", render(&layout)?);

    let layout = Layout::new(lv!(4, lv!(4, 2)), lv!(4, lv!(1, 16)))?;
    println!("Column-major interleave");
    println!("{}", render(&layout)?);

    let layout = Layout::new(lv!(lv!(2, 2), lv!(4, 2)), lv!(lv!(1, 8), lv!(2, 16)))?;
    println!("Mixed");
    println!("{}", render(&layout)?);

    // Access some linear indices
    let index = layout.offset(&lv!(lv!(1, 0), lv!(2, 0)))?;
    println!("row 1, column 2 is at linear index: {index}");
    let index = layout.offset(&lv!(lv!(1, 1), lv!(1, 1)))?;
    println!("row 3, column 5 is at linear index: {index}");

    Ok(())
}

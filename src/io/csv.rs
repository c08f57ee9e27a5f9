use std::io::{self, Write};
use std::path::Path;

use crate::sim::SimulationLog;

/// Write the per-step log in CSV format.
///
/// Columns: time, x, y, z, roll, pitch, yaw, u, v, w, p, q, r,
///          ex, ey, ez, u1, u2, u3, u4
pub fn write_log<W: Write>(writer: &mut W, log: &SimulationLog) -> io::Result<()> {
    writeln!(
        writer,
        "time,x,y,z,roll,pitch,yaw,u,v,w,p,q,r,\
         ex,ey,ez,u1,u2,u3,u4"
    )?;

    for e in log.entries() {
        let s = e.state.to_array();
        let u = e.input.to_array();
        writeln!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},\
             {:.6},{:.6},{:.6},{:.6},{:.6},{:.6},\
             {:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            e.time,
            s[0],
            s[1],
            s[2],
            s[3],
            s[4],
            s[5],
            s[6],
            s[7],
            s[8],
            s[9],
            s[10],
            s[11],
            e.position_error.x,
            e.position_error.y,
            e.position_error.z,
            u[0],
            u[1],
            u[2],
            u[3],
        )?;
    }

    Ok(())
}

/// Write the log to a CSV file at the given path.
pub fn write_log_file(path: impl AsRef<Path>, log: &SimulationLog) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_log(&mut file, log)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfigBuilder;
    use crate::route::presets;
    use crate::sim::simulate;

    #[test]
    fn csv_output_has_header_and_rows() {
        let config = SimConfigBuilder::new().t_max(0.05).build().unwrap();
        let log = simulate(&config, &presets::square()).unwrap();

        let mut buf = Vec::new();
        write_log(&mut buf, &log).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,x,y,z,"));
        assert_eq!(lines.len(), 6); // header + 5 data rows
        assert!(lines[1].starts_with("0.0000,"));
        assert!(lines.iter().all(|l| l.split(',').count() == 20));
    }
}

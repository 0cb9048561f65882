use acnet_core::units::IMPEDANCE;
use acnet_core::{Circuit, Diagnostics, Phasor};
use anyhow::Result;
use std::io::Write;
use tabwriter::TabWriter;

fn impedance_text(z: &Phasor) -> String {
    let (value, unit) = IMPEDANCE.scale(z.magnitude);
    format!("{value:.2}∠{:.2}° {unit}", z.phase_deg)
}

fn admittance_text(y: &Phasor) -> String {
    format!("{:.4}∠{:.2}° S", y.magnitude, y.phase_deg)
}

/// Plain-text listing of nodes, branches and components.
pub fn write_text(circuit: &Circuit, out: &mut impl Write) -> Result<()> {
    let report = circuit.report();
    writeln!(out, "Circuit at {}", circuit.frequency())?;
    writeln!(out, "{}", circuit.stats())?;

    writeln!(out, "\nNodes:")?;
    for node in &report.nodes {
        writeln!(out, "  {}", node.display)?;
    }

    writeln!(out, "\nBranches:")?;
    {
        let mut table = TabWriter::new(&mut *out);
        writeln!(table, "  BRANCH\tCOMPONENTS\tZ\tY")?;
        for branch in &report.branches {
            let (z, y) = match (&branch.impedance, &branch.admittance, &branch.error) {
                (Some(z), Some(y), _) => (impedance_text(z), admittance_text(y)),
                (_, _, Some(err)) => (format!("error: {err}"), "-".to_string()),
                _ => ("unknown".to_string(), "unknown".to_string()),
            };
            writeln!(
                table,
                "  {}\t{}\t{}\t{}",
                branch.display,
                branch.components.join(" "),
                z,
                y
            )?;
        }
        table.flush()?;
    }

    writeln!(out, "\nComponents:")?;
    let mut table = TabWriter::new(&mut *out);
    writeln!(table, "  KEY\tKIND\tBRANCH\tVALUE")?;
    for component in &report.components {
        let value = match (&component.control, component.errors.first()) {
            (_, Some(err)) => format!("{} (error: {err})", component.display),
            (Some(law), None) if law != &component.display => {
                format!("{} [{law}]", component.display)
            }
            _ => component.display.clone(),
        };
        writeln!(
            table,
            "  {}\t{}\t{}\t{}",
            component.key, component.kind, component.branch, value
        )?;
    }
    table.flush()?;
    Ok(())
}

pub fn write_json(circuit: &Circuit, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &circuit.report())?;
    writeln!(out)?;
    Ok(())
}

pub fn write_diagnostics_text(diag: &Diagnostics, out: &mut impl Write) -> Result<()> {
    for issue in &diag.issues {
        writeln!(out, "{issue}")?;
    }
    writeln!(out, "{}", diag.summary())?;
    Ok(())
}

pub fn write_diagnostics_json(diag: &Diagnostics, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, diag)?;
    writeln!(out)?;
    Ok(())
}

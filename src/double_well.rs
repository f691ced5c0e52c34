#![allow(non_snake_case)]

use std::path::PathBuf;
use ndarray as nd;
use manybody_sim::{
    mkdir,
    write_npz,
    hilbert::PositionBasis,
    systems::{
        SystemParams,
        double_well::{ DoubleWell, DoubleWellParams },
    },
};

const N_LEVELS: usize = 6;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")).init();

    let params
        = match std::env::args().nth(1) {
            Some(path) => DoubleWellParams::from_file(path)?,
            None => DoubleWellParams::default(),
        };
    log::info!("{:?}", params);

    let outdir = PathBuf::from("output/double_well");
    mkdir!(outdir)?;

    let dw = DoubleWell::new(&params)?;
    let (E, states) = dw.spectrum(N_LEVELS)?;
    log::info!("many-body energies: {:?}", E);
    let density = dw.density(&states[0])?;
    let X_mb = dw.total_position()?;
    let x_mean: nd::Array1<f64>
        = states.iter()
        .map(|psi| X_mb.expect(psi).map(|x| x.re))
        .collect::<Result<_, _>>()?;

    let points
        = PositionBasis::new(params.xmin, params.xmax, params.n_grid)?.points();
    let mode_energies = nd::Array1::from(dw.energies.clone());
    let energies = nd::Array1::from(E);
    write_npz!(
        outdir.join("spectrum.npz"),
        arrays: {
            "x" => &points,
            "mode_energies" => &mode_energies,
            "energies" => &energies,
            "density" => &density,
            "x_mean" => &x_mean,
            "H1" => dw.H1.data(),
            "X" => dw.X.data(),
            "H" => dw.H.data(),
        }
    )?;

    log::info!("done");
    Ok(())
}

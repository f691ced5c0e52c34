#![allow(non_snake_case)]

use std::path::PathBuf;
use ndarray as nd;
use manybody_sim::{
    mkdir,
    write_npz,
    systems::{
        SystemParams,
        kicked_top::{ KickedTop, KickedTopParams },
    },
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")).init();

    let params
        = match std::env::args().nth(1) {
            Some(path) => KickedTopParams::from_file(path)?,
            None => KickedTopParams::default(),
        };
    log::info!("{:?}", params);

    let outdir = PathBuf::from("output/kicked_top");
    mkdir!(outdir)?;

    let kt = KickedTop::new(&params)?;
    let kicks: nd::Array1<f64> = (0..=params.n_kicks).map(|n| n as f64).collect();
    let traj = kt.run()?;
    log::info!("evolved {} kicks", params.n_kicks);
    write_npz!(
        outdir.join("trajectory.npz"),
        arrays: {
            "kick" => &kicks,
            "J" => &traj,
            "U" => kt.floquet.data(),
        }
    )?;

    log::info!("done");
    Ok(())
}

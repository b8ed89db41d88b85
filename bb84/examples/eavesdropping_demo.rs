use bb84::{run_protocol, simulate_trial, CascadeToeplitz, ChannelModel, EstimatorConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("BB84 Eavesdropping Simulation");

    let mut rng = StdRng::seed_from_u64(84);
    let config = EstimatorConfig::default();
    let distiller = CascadeToeplitz::default();

    let channels = [
        ("clean channel", ChannelModel::default()),
        ("3% noise", ChannelModel::noisy(0.03)),
        ("15% noise", ChannelModel::noisy(0.15)),
        ("Eve on 20% of qubits", ChannelModel::intercepted(0.2)),
        ("Eve on every qubit", ChannelModel::intercepted(1.0)),
    ];

    for (label, channel) in channels.iter() {
        let trial = simulate_trial(2_000, channel, &mut rng)?;
        let report = run_protocol(&trial, &config, &distiller, &mut rng)?;
        let key_len = report.final_key.as_ref().map_or(0, |k| k.len());
        println!(
            "{:<22} sifted {:>4}  {}  -> {} (final key {} bits)",
            label,
            report.sifted.len(),
            report.estimate,
            report.verdict,
            key_len
        );
    }

    Ok(())
}

use bb84::bb84_states::format_bits;
use bb84::{
    run_protocol, simulate_trial, CascadeToeplitz, ChannelModel, DistillerConfig, EstimatorConfig,
    SampleSelection,
};
use rand::thread_rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut rng = thread_rng();
    let n = 256; // Number of qubits

    let trial = simulate_trial(n, &ChannelModel::noisy(0.02), &mut rng)?;
    let config = EstimatorConfig::default().with_sample(SampleSelection::RandomFraction(0.25));
    let distiller = CascadeToeplitz::new(DistillerConfig {
        compression: 0.6,
        ..DistillerConfig::default()
    })?;

    let report = run_protocol(&trial, &config, &distiller, &mut rng)?;

    println!("Alice's Bits:      {}", format_bits(trial.sender_bits()));
    println!("Bob's Measurements: {}", format_bits(trial.receiver_bits()));
    println!("Sifted Alice:      {}", format_bits(&report.sifted.sender));
    println!("Sifted Bob:        {}", format_bits(&report.sifted.receiver));
    println!("Disclosed:         {:?}", report.sample);
    println!("{} -> {}", report.estimate, report.verdict);

    match report.final_key {
        Some(key) => {
            println!("Final Alice's Key: {}", format_bits(&key.sender));
            println!("Final Bob's Key:   {}", format_bits(&key.receiver));
            println!("Confirmed: {} ({} parities leaked)", key.confirmed, key.leaked_parities);
        }
        None => println!("No final key"),
    }

    Ok(())
}

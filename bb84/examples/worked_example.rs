use bb84::bb84_states::{format_bases, format_bits};
use bb84::qber::mismatch_positions;
use bb84::{decide_security, sift_trial, Bb84Error, EstimatorConfig, Trial};

// The eight positions drawn in the protocol-flow figure.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let trial = Trial::worked_example();
    println!("Alice sends bases:  {}", format_bases(trial.sender_bases()));
    println!("Alice bits:         {}", format_bits(trial.sender_bits()));
    println!("Bob sends bases:    {}", format_bases(trial.receiver_bases()));
    println!("Bob results:        {}", format_bits(trial.receiver_bits()));

    let sifted = sift_trial(&trial)?;
    let positions: Vec<usize> = sifted.matching_indices.iter().map(|i| i + 1).collect();
    println!("Matching positions: {:?}", positions);
    println!("Alice sifted:       {}", format_bits(&sifted.sender));
    println!("Bob sifted:         {}", format_bits(&sifted.receiver));
    println!(
        "Sifted mismatches:  {:?}",
        mismatch_positions(&sifted.sender, &sifted.receiver)
    );

    match bb84::estimate_error_rate(&sifted.sender, &sifted.receiver, &sifted_sample(&sifted)) {
        Ok(estimate) => println!("{}", estimate),
        Err(Bb84Error::EmptySample) => {
            println!("No basis matches: nothing to disclose, QBER undefined");
        }
        Err(e) => return Err(e.into()),
    }

    // The figure prints an illustrative 0.6%; the verdict function takes any rate.
    let threshold = EstimatorConfig::default().threshold;
    println!(
        "Illustrative QBER 0.6% against {:.0}% -> {}",
        threshold * 100.0,
        decide_security(0.006, threshold)
    );

    Ok(())
}

fn sifted_sample(sifted: &bb84::SiftedKeys) -> Vec<usize> {
    // First matching position only, as in the figure's error-detection box.
    (0..sifted.len().min(1)).collect()
}

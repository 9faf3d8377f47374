use std::time::Instant;

use ising_sim::{Algorithm, IsingConfig, IsingModel, NoopObserver};

const L: usize = 128;
const BETA: f64 = 0.4406868;
const N_STEPS: [(Algorithm, usize); 3] = [
    (Algorithm::Metropolis, 1_000_000),
    (Algorithm::Wolff, 2_000),
    (Algorithm::SwendsenWang, 200),
];

fn main() {
    println!("Lattice: {}x{}  |  beta: {}  |  J: 1  |  B: 0", L, L, BETA);
    println!("{}", "-".repeat(70));

    for (algorithm, steps) in N_STEPS {
        let config = IsingConfig::new(vec![L, L], 0.0, 1.0, BETA, algorithm);
        let mut model = IsingModel::new(&config).unwrap();

        let t0 = Instant::now();
        model.run(steps, &mut NoopObserver, false).unwrap();
        let elapsed = t0.elapsed().as_secs_f64();

        let per_step = elapsed / steps as f64 * 1000.0;
        println!(
            "{:<14} {:>9} steps  |  Total: {:.3} s  |  {:.6} ms/step  |  E/N = {:.4}",
            format!("{:?}", algorithm),
            steps,
            elapsed,
            per_step,
            model.hamiltonian() / model.get_size() as f64
        );
    }
}

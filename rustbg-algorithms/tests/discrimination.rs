use approx::assert_relative_eq;
use rustbg_algorithms::{
    BackgroundConfig, BackgroundSubtractor, BatchRunner, Error, MaskCode, NormalDiscriminator,
    PixelDiscriminator, PoissonDiscriminator, Reflection,
};

/// 7x7 shoebox with a flat 9/10/11 background and bright pixels at `spot`.
fn shoebox_with_spot(spot: &[usize]) -> Vec<f64> {
    (0..49usize)
        .map(|i| {
            let background = match (i % 7 + i / 7) % 3 {
                0 => 9.0,
                1 => 10.0,
                _ => 11.0,
            };
            if spot.contains(&i) {
                background + 300.0
            } else {
                background
            }
        })
        .collect()
}

/// Central 3x3 block of a 7x7 shoebox.
fn central_block() -> Vec<usize> {
    (0..49)
        .filter(|i| (2..=4).contains(&(i % 7)) && (2..=4).contains(&(i / 7)))
        .collect()
}

fn assert_separates(discriminator: &dyn PixelDiscriminator, spot: &[usize]) {
    let shoebox = shoebox_with_spot(spot);
    let mut mask = vec![0b10; 49];
    discriminator.discriminate(&shoebox, &mut mask).unwrap();

    for (i, &code) in mask.iter().enumerate() {
        assert_eq!(
            MaskCode::is_background(code),
            !spot.contains(&i),
            "{} misclassified pixel {i}",
            discriminator.name()
        );
        assert_eq!(code & 0b10, 0b10, "other bits must be preserved");
    }
}

#[test]
fn test_poisson_separates_block_spot() {
    let discriminator = PoissonDiscriminator::new(10, 3.0).unwrap();
    assert_separates(&discriminator, &central_block());
}

#[test]
fn test_normal_separates_small_spot() {
    let discriminator = NormalDiscriminator::new(10, 3.0).unwrap();
    assert_separates(&discriminator, &[24, 25]);
}

#[test]
fn test_background_ignores_spot() {
    let spot = central_block();
    let shoebox = shoebox_with_spot(&spot);
    let config = BackgroundConfig::new().with_min_data(10).with_n_sigma(3.0);
    let subtractor = BackgroundSubtractor::from_config(&config).unwrap();

    let mut mask = vec![0; 49];
    let value = subtractor.estimate(&shoebox, &mut mask).unwrap();

    let expected = shoebox
        .iter()
        .enumerate()
        .filter(|(i, _)| !spot.contains(i))
        .map(|(_, v)| v)
        .sum::<f64>()
        / 40.0;
    assert_relative_eq!(value, expected, epsilon = 1e-12);
}

#[test]
fn test_too_few_pixels_invalidates_reflection() {
    let config = BackgroundConfig::new().with_min_data(20).with_num_threads(2);
    let runner = BatchRunner::from_config(&config).unwrap();

    let mut reflections = vec![
        Reflection::new(shoebox_with_spot(&central_block()), vec![0; 49]),
        Reflection::new(vec![5.0; 8], vec![0; 8]),
    ];
    runner.run(&mut reflections);

    assert!(reflections[0].valid);
    assert!(!reflections[1].valid);

    let mut mask = vec![0; 8];
    let err = runner
        .subtractor()
        .estimate(&[5.0; 8], &mut mask)
        .unwrap_err();
    assert!(matches!(err, Error::StatisticalFailure(_)));
}

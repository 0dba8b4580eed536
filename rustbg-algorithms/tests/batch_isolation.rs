#![allow(clippy::float_cmp)]
use rustbg_algorithms::{
    BackgroundSubtractor, BatchRunner, Error, PixelDiscriminator, PresetDiscriminator, Reflection,
    Result,
};
use rustbg_core::Status;

/// Fails on any shoebox containing a negative pixel, otherwise trusts the mask.
struct RejectNegative;

impl PixelDiscriminator for RejectNegative {
    fn discriminate(&self, shoebox: &[f64], _mask: &mut [i32]) -> Result<()> {
        if shoebox.iter().any(|&v| v < 0.0) {
            Err(Error::StatisticalFailure("negative pixel".into()))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "RejectNegative"
    }
}

fn good(value: f64) -> Reflection {
    Reflection::new(vec![value, value + 2.0, 1000.0], vec![1, 1, 0])
}

#[test]
fn test_skipped_reflection_is_untouched() {
    let mut reflections = vec![good(1.0), good(5.0).with_status(Status(5))];
    let before = reflections[1].clone();

    BackgroundSubtractor::with_discriminator(PresetDiscriminator).run_batch(&mut reflections);

    assert_eq!(reflections[0].background, vec![2.0; 3]);
    assert_eq!(reflections[1], before);
}

#[test]
fn test_empty_background_failure_is_isolated() {
    for k in 0..5 {
        let mut reflections: Vec<Reflection> = (0..5u32).map(|i| good(f64::from(i))).collect();
        reflections[k].mask = vec![0, 0, 0];

        BackgroundSubtractor::with_discriminator(PresetDiscriminator).run_batch(&mut reflections);

        for (i, reflection) in reflections.iter().enumerate() {
            if i == k {
                assert!(!reflection.valid, "reflection {k} should be invalid");
            } else {
                let expected = f64::from(u32::try_from(i).unwrap()) + 1.0;
                assert!(reflection.valid, "reflection {i} should stay valid");
                assert_eq!(reflection.background, vec![expected; 3]);
            }
            assert_eq!(reflection.status, Status::UNPROCESSED);
        }
    }
}

#[test]
fn test_statistical_failure_is_isolated() {
    let mut reflections = vec![
        good(1.0),
        Reflection::new(vec![-1.0, 2.0, 3.0], vec![1, 1, 1]),
        good(3.0),
    ];

    let runner = BatchRunner::new(
        BackgroundSubtractor::with_discriminator(RejectNegative),
        Some(3),
    )
    .unwrap();
    runner.run(&mut reflections);

    assert!(reflections[0].valid);
    assert!(!reflections[1].valid);
    assert_eq!(reflections[1].background, vec![0.0; 3]);
    assert!(reflections[2].valid);
    assert_eq!(reflections[2].background, vec![4.0; 3]);
}

#[test]
fn test_shape_mismatch_is_isolated() {
    let mut reflections = vec![good(1.0), Reflection::new(vec![1.0, 2.0], vec![1])];

    BackgroundSubtractor::with_discriminator(PresetDiscriminator).run_batch(&mut reflections);

    assert!(reflections[0].valid);
    assert!(!reflections[1].valid);
}

#[test]
fn test_large_batch_matches_sequential() {
    let make = || -> Vec<Reflection> {
        (0..2000u32)
            .map(|i| {
                let base = f64::from(i % 17);
                let mask = if i % 7 == 0 { vec![0; 4] } else { vec![1, 1, 0, 1] };
                Reflection::new(vec![base, base + 1.0, 500.0, base + 2.0], mask)
                    .with_status(Status(i32::from(i % 11 == 0)))
            })
            .collect()
    };

    let subtractor = BackgroundSubtractor::with_discriminator(PresetDiscriminator);
    let mut parallel = make();
    subtractor.run_batch(&mut parallel);

    let mut sequential = make();
    for reflection in sequential.iter_mut().filter(|r| r.is_unprocessed()) {
        if subtractor.process_reflection(reflection).is_err() {
            reflection.valid = false;
        }
    }

    assert_eq!(parallel, sequential);
}

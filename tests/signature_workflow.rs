use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use approx::assert_abs_diff_eq;
use ndarray::{Array2, ArrayView2};

use lipsig::io::{lip_csv_path, read_lip_matrix};
use lipsig::pipeline::orientation_merit;
use lipsig::{
    Direction, LIP_COUNT, MirrorMode, PipelineConfig, SignatureWorkflow, Sinogram,
    SinogramTransform,
};

fn temp_dir(name: &str) -> PathBuf {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let mut path = std::env::temp_dir();
    path.push(format!("lipsig_{}_{}", name, epoch));
    path
}

fn ellipse(size: usize, ry: f64, rx: f64) -> Array2<f64> {
    let c = (size as f64 - 1.0) / 2.0;
    Array2::from_shape_fn((size, size), |(y, x)| {
        let dy = (y as f64 - c) / ry;
        let dx = (x as f64 - c) / rx;
        if dy * dy + dx * dx <= 1.0 { 255.0 } else { 0.0 }
    })
}

fn small_config(mirror: MirrorMode) -> PipelineConfig {
    PipelineConfig {
        angle_count: 36,
        mirror,
        ..PipelineConfig::default()
    }
}

#[test]
fn reflect_alignment_puts_the_lip0_peak_first() -> Result<()> {
    let workflow = SignatureWorkflow::new(small_config(MirrorMode::Reflect));
    let m = ellipse(32, 12.0, 5.0);
    let s = ellipse(32, 6.0, 10.0);
    let t = ellipse(32, 9.0, 9.0);
    let summary = workflow.execute([m.view(), s.view(), t.view()])?;

    for record in summary.signatures.iter() {
        assert_eq!(record.bundle.len(), 36);
        for i in 0..LIP_COUNT {
            assert_eq!(record.bundle.lip(i).len(), 36);
        }
        assert_eq!(record.bundle.lip0()[0], record.alignment.peak);
        let max = record
            .bundle
            .lip0()
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max, record.alignment.peak);
    }
    let merits = summary.signatures.orientation_merits();
    assert_eq!(
        merits[0],
        summary.signatures.get(Direction::M).orientation_merit()
    );
    Ok(())
}

#[test]
fn signature_files_round_trip_through_csv() -> Result<()> {
    let dir = temp_dir("signature_files");
    fs::create_dir_all(&dir)?;
    let mut image_paths = Vec::new();
    let radii = [(10.0, 4.0), (5.0, 9.0), (8.0, 8.0)];
    for (direction, (ry, rx)) in Direction::ALL.into_iter().zip(radii) {
        let pixels = ellipse(28, ry, rx);
        let gray = image::GrayImage::from_fn(28, 28, |x, y| {
            image::Luma([pixels[(y as usize, x as usize)] as u8])
        });
        let path = dir.join(format!("cup_{}.png", direction));
        gray.save(&path)?;
        image_paths.push(path);
    }

    let workflow = SignatureWorkflow::new(small_config(MirrorMode::Reverse));
    let out_dir = dir.join("lip");
    let files = workflow.execute_files(
        [
            image_paths[0].as_path(),
            image_paths[1].as_path(),
            image_paths[2].as_path(),
        ],
        &out_dir,
        "cup",
    )?;
    assert_eq!(files.paths.len(), 3);

    for record in files.summary.signatures.iter() {
        let path = lip_csv_path(&out_dir, "cup", record.direction);
        let stored = read_lip_matrix(&path)?;
        assert_eq!(stored.dim(), (36, LIP_COUNT));
        assert_eq!(stored, record.bundle.to_matrix());
        assert_abs_diff_eq!(
            orientation_merit(stored.view())?,
            record.orientation_merit(),
            epsilon = 1e-12
        );
    }

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

/// Every angle column is the same bump, scaled by a per-angle weight.
struct ScaledBump {
    weights: Vec<f64>,
}

impl SinogramTransform for ScaledBump {
    fn transform(&self, _image: ArrayView2<'_, f64>, angles_deg: &[f64]) -> Sinogram {
        let bump = [0.0, 1.0, 3.0, 1.0, 0.0];
        Sinogram::new(Array2::from_shape_fn((bump.len(), angles_deg.len()), |(r, a)| {
            bump[r] * self.weights[a]
        }))
    }
}

#[test]
fn custom_transforms_drive_the_same_alignment() -> Result<()> {
    // LIP0 = 3w/3 = w; max at 4, min at 6 (second half of 8) -> shift only
    let weights = vec![2.0, 2.5, 3.0, 3.5, 9.0, 4.0, 0.5, 1.0];
    let config = PipelineConfig {
        angle_count: weights.len(),
        ..PipelineConfig::default()
    };
    let workflow = SignatureWorkflow::with_transform(config, ScaledBump { weights });
    let image = Array2::<f64>::zeros((4, 4));
    let record = workflow.direction(Direction::T, image.view())?;

    assert_eq!(record.alignment.shift, 4);
    assert!(!record.alignment.mirrored);
    let lip0 = record.bundle.lip0();
    let expected = [9.0, 4.0, 0.5, 1.0, 2.0, 2.5, 3.0, 3.5];
    for (got, want) in lip0.iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
    }
    // rise fraction depends only on the bump shape
    for value in record.bundle.lip(1) {
        assert_abs_diff_eq!(*value, 1.0 / 3.0, epsilon = 1e-12);
    }
    Ok(())
}

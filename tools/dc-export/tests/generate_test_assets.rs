//! Test asset generation
//!
//! Writes small source files (PNG, WAV, OBJ) and bundle manifests using the
//! same libraries the exporter reads them with.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;

/// Generate a `width`×`height` RGB gradient PNG
pub fn generate_gradient_png(path: &Path, width: u32, height: u32) -> std::io::Result<()> {
    let image = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    image.save(path).map_err(std::io::Error::other)
}

/// Generate a short 16-bit sine WAV
pub fn generate_sine_wav(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    frames: usize,
) -> std::io::Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(std::io::Error::other)?;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = ((t * 440.0 * std::f32::consts::TAU).sin() * 8000.0) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).map_err(std::io::Error::other)?;
        }
    }
    writer.finalize().map_err(std::io::Error::other)
}

/// Generate a unit cube OBJ with one quad per face
pub fn generate_cube_obj(path: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;

    writeln!(file, "# Simple cube for testing")?;
    writeln!(file)?;

    writeln!(file, "v -0.5 -0.5  0.5")?;
    writeln!(file, "v  0.5 -0.5  0.5")?;
    writeln!(file, "v  0.5  0.5  0.5")?;
    writeln!(file, "v -0.5  0.5  0.5")?;
    writeln!(file, "v -0.5 -0.5 -0.5")?;
    writeln!(file, "v  0.5 -0.5 -0.5")?;
    writeln!(file, "v  0.5  0.5 -0.5")?;
    writeln!(file, "v -0.5  0.5 -0.5")?;
    writeln!(file)?;

    writeln!(file, "vt 0 0")?;
    writeln!(file, "vt 1 0")?;
    writeln!(file, "vt 1 1")?;
    writeln!(file, "vt 0 1")?;
    writeln!(file)?;

    writeln!(file, "f 1/1 2/2 3/3 4/4")?; // front
    writeln!(file, "f 6/1 5/2 8/3 7/4")?; // back
    writeln!(file, "f 5/1 1/2 4/3 8/4")?; // left
    writeln!(file, "f 2/1 6/2 7/3 3/4")?; // right
    writeln!(file, "f 4/1 3/2 7/3 8/4")?; // top
    writeln!(file, "f 5/1 6/2 2/3 1/4")?; // bottom

    Ok(())
}

/// Source files plus a manifest that lists them:
/// texture, audio, broken texture, mesh, material, unsupported kind
pub fn generate_bundle(dir: &Path) -> std::io::Result<()> {
    generate_gradient_png(&dir.join("brick.png"), 3, 5)?;
    generate_sine_wav(&dir.join("hit.wav"), 22050, 1, 2205)?;
    generate_cube_obj(&dir.join("cube.obj"))?;

    fs::write(
        dir.join("bundle.toml"),
        r#"
[[assets]]
kind = "Texture2D"
name = "Brick/Wall"
path = "brick.png"

[[assets]]
kind = "AudioClip"
name = "hit"
path = "hit.wav"

[[assets]]
kind = "Texture2D"
name = "missing"
path = "does-not-exist.png"

[[assets]]
kind = "Mesh"
name = "cube"
path = "cube.obj"

[[assets]]
kind = "Material"
name = "Brick/Wall"
shader = "Standard"
properties = { _Glossiness = 0.5, _Mode = 0, _Color = [1.0, 0.5, 0.5, 1.0] }

[[assets]]
kind = "AnimationClip"
name = "walk"
"#,
    )
}

mod common;

use common::synthetic_image::gradient;
use degrade::image_io::{load_image, save_image};
use degrade::output::{OutputSink, PairWriter};
use degrade::source::{DirectorySource, ImageSource};
use degrade::{Blur, Image, Interpolation, Noise, Pipeline, Sampling};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn directory_to_pairs_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    save_image(input.path().join("one.png"), &gradient(32, 24, 3)).unwrap();
    save_image(input.path().join("two.png"), &gradient(16, 40, 3)).unwrap();

    let pipeline = Pipeline::new()
        .with("random:0.5".parse::<Sampling>().unwrap())
        .with(Noise::Gaussian { sigma: 10.0 })
        .with(Blur::new(Interpolation::Bilinear, 2));

    let mut source = DirectorySource::new(input.path()).unwrap();
    let mut sink = PairWriter::new(output.path()).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    while let Some((name, clean)) = source.next_image().unwrap() {
        let pair = pipeline.pair(clean.view(), &mut rng).unwrap();
        assert_eq!(pair.input.dim(), clean.dim());
        sink.write_pair(&name, &pair).unwrap();
    }
    assert_eq!(sink.written(), 2);

    for name in ["one", "two"] {
        let label = load_image(output.path().join("label").join(format!("{name}.png"))).unwrap();
        let clean = load_image(input.path().join(format!("{name}.png"))).unwrap();
        assert_eq!(label, clean);

        let degraded = load_image(output.path().join("input").join(format!("{name}.png"))).unwrap();
        assert_eq!(degraded.dim(), clean.dim());
        assert_ne!(degraded, clean);
    }
}

#[test]
fn images_sharing_a_stem_keep_separate_pairs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    save_image(input.path().join("a.png"), &Image::zeros((8, 8, 3))).unwrap();
    save_image(input.path().join("a.bmp"), &Image::ones((8, 8, 3))).unwrap();

    let mut source = DirectorySource::new(input.path()).unwrap();
    let mut sink = PairWriter::new(output.path()).unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    while let Some((name, clean)) = source.next_image().unwrap() {
        let pair = Pipeline::new().pair(clean.view(), &mut rng).unwrap();
        sink.write_pair(&name, &pair).unwrap();
    }
    assert_eq!(sink.written(), 2);

    let label_dir = output.path().join("label");
    let mut labels: Vec<_> = std::fs::read_dir(&label_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    labels.sort();
    assert_eq!(labels, ["a_bmp.png", "a_png.png"]);

    let white = load_image(label_dir.join("a_bmp.png")).unwrap();
    let black = load_image(label_dir.join("a_png.png")).unwrap();
    assert!(white.iter().all(|&v| v == 1.0));
    assert!(black.iter().all(|&v| v == 0.0));
}

#[test]
fn checkpoint_resume_picks_latest_epoch() {
    use degrade::checkpoint::{self, Checkpoint};

    let dir = tempfile::tempdir().unwrap();
    let ckpt_dir = dir.path().join("checkpoint");

    assert_eq!(checkpoint::latest_epoch(&ckpt_dir).unwrap(), 0);

    for epoch in 1..=12 {
        let state = Checkpoint {
            net: epoch.to_string().into_bytes(),
            optim: vec![epoch as u8],
        };
        checkpoint::save(&ckpt_dir, &state, epoch).unwrap();
    }

    let (state, epoch) = checkpoint::load(&ckpt_dir).unwrap();
    assert_eq!(epoch, 12);
    let state = state.unwrap();
    assert_eq!(state.net, b"12".to_vec());
    assert_eq!(state.optim, vec![12]);
}

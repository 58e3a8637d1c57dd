use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use texel_ascii::converter::{ConvertRequest, Converter};
use texel_ascii::glyph::GlyphBrightnessCache;
use texel_ascii::matcher::CharMatcher;
use texel_core::charset::{CHARSET_STANDARD, charset_from_str};
use texel_core::frame::FrameBuffer;

fn bench_query(c: &mut Criterion) {
    let mut glyphs = GlyphBrightnessCache::default();
    let matcher = CharMatcher::new(CHARSET_STANDARD.chars(), &mut glyphs)
        .unwrap_or_else(|e| panic!("charset standard invalide : {e}"));

    c.bench_function("matcher_query_1024", |b| {
        b.iter(|| {
            for i in 0..1024u32 {
                let _ = black_box(matcher.query(f64::from(i) / 1023.0));
            }
        });
    });
}

fn bench_add_remove(c: &mut Criterion) {
    let mut glyphs = GlyphBrightnessCache::default();
    let mut matcher = CharMatcher::new(CHARSET_STANDARD.chars(), &mut glyphs)
        .unwrap_or_else(|e| panic!("charset standard invalide : {e}"));

    // '+' est intérieur : chemin incrémental
    c.bench_function("matcher_remove_add_interior", |b| {
        b.iter(|| {
            matcher.remove_char(black_box('+'));
            matcher.add_char(black_box('+'), &mut glyphs);
        });
    });

    // ' ' est le minimum : reconstruction complète
    c.bench_function("matcher_remove_add_extreme", |b| {
        b.iter(|| {
            matcher.remove_char(black_box(' '));
            matcher.add_char(black_box(' '), &mut glyphs);
        });
    });
}

fn bench_convert(c: &mut Criterion) {
    let mut fb = FrameBuffer::new(512, 384);
    for y in 0..fb.height {
        for x in 0..fb.width {
            let v = ((x ^ y) & 0xFF) as u8;
            fb.set_pixel(x, y, (v, v, v));
        }
    }
    let request = ConvertRequest {
        image: Arc::new(fb),
        charset: charset_from_str(CHARSET_STANDARD),
        resolution: 128,
        invert: false,
    };
    let mut converter = Converter::default();

    c.bench_function("convert_512x384_cached", |b| {
        b.iter(|| black_box(converter.convert(&request)));
    });
}

criterion_group!(benches, bench_query, bench_add_remove, bench_convert);
criterion_main!(benches);

#![no_main]

use bezier_spline_engine::parse_spline_document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(doc) = parse_spline_document(text) else {
        return;
    };
    // Große Dokumente würden nur Zeit kosten
    if doc.nodes.len() > 256 {
        return;
    }

    let mut spline = doc.into_spline();
    // Zweiter Durchlauf ohne Änderung darf nichts tun
    assert!(!spline.recalculate());
    let _ = spline.insert_node(0.5);
    if !spline.nodes.is_empty() {
        let _ = spline.remove_node(spline.nodes.len() - 1);
    }
    spline.recalculate();
});

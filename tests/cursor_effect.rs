use cursorfx::integrator::SmoothingIntegrator;
use cursorfx::math::{Point, Rect, Size};
use cursorfx::render::CursorClass;
use cursorfx::state::EffectState;
use cursorfx::{
    CursorEffect, CursorElement, EffectConfig, EffectPhase, Host, Preset, RendererBinding,
};
use proptest::prelude::*;
use std::rc::Rc;

fn mount(host: &Host, config: EffectConfig) -> (CursorEffect, Rc<CursorElement>) {
    let element = Rc::new(CursorElement::new());
    let mut effect = CursorEffect::new(config, element.clone()).unwrap();
    effect.mount(host).unwrap();
    (effect, element)
}

fn run_frames(host: &Host, frames: u64) {
    for i in 0..frames {
        host.run_frame(i * 16_666_667);
    }
}

#[test]
fn cursor_eases_toward_the_pointer() {
    // zero-sized viewport puts both positions at the origin
    let host = Host::new(Size::ZERO);
    let (effect, element) = mount(&host, EffectConfig::default());

    host.pointer_move(Point::new(100.0, 0.0));
    run_frames(&host, 1);
    assert!((effect.cursor().x - 15.0).abs() < 1e-9);
    assert!((element.transform().translate_x + 3.0).abs() < 1e-9);

    run_frames(&host, 9);
    let remaining = 100.0 - effect.cursor().x;
    assert!((remaining - 100.0 * 0.85f64.powi(10)).abs() < 1e-9);
    assert!((remaining - 19.687).abs() < 1e-3);
    assert_eq!(effect.frames(), 10);
}

#[test]
fn cursor_closes_in_on_the_origin_from_the_centre() {
    let host = Host::new(Size::new(200.0, 200.0));
    let (effect, _) = mount(&host, EffectConfig::default());
    assert_eq!(effect.cursor().point(), Point::new(100.0, 100.0));

    host.pointer_move(Point::ZERO);
    run_frames(&host, 1);
    let cursor = effect.cursor();
    assert!((cursor.x - 85.0).abs() < 1e-9 && (cursor.y - 85.0).abs() < 1e-9);

    run_frames(&host, 9);
    let cursor = effect.cursor();
    assert!((cursor.x - 19.687).abs() < 1e-3 && (cursor.y - 19.687).abs() < 1e-3);
}

#[test]
fn binding_centres_the_element_on_the_point() {
    let element = Rc::new(CursorElement::new());
    let binding = RendererBinding::new(element.clone(), 18.0);
    binding.apply(50.0, 50.0, 1.0);

    let t = element.transform();
    assert_eq!((t.translate_x, t.translate_y, t.scale), (32.0, 32.0, 1.0));
    assert_eq!(t.to_string(), "translate3d(32.00px, 32.00px, 0) scale(1)");
}

#[test]
fn leaving_a_target_restores_exactly_one() {
    let host = Host::new(Size::new(400.0, 400.0));
    host.page().insert("card", &["projects-box"], Rect::new(0.0, 0.0, 100.0, 100.0));
    let (effect, element) = mount(&host, Preset::Projects.config());

    host.pointer_move(Point::new(50.0, 50.0));
    run_frames(&host, 1);
    assert_eq!(element.transform().scale, 1.8);
    assert!(element.has_class(CursorClass::Hover));

    host.pointer_move(Point::new(250.0, 250.0));
    run_frames(&host, 1);
    assert_eq!(effect.cursor().scale, 1.0);
    assert_eq!(element.transform().scale, 1.0);
    assert!(!element.has_class(CursorClass::Hover));
}

#[test]
fn skills_rows_use_their_own_scale() {
    let host = Host::new(Size::new(400.0, 400.0));
    host.page().insert("row", &["skill-row"], Rect::new(0.0, 0.0, 400.0, 40.0));
    let (_effect, element) = mount(&host, Preset::Skills.config());

    host.pointer_move(Point::new(10.0, 10.0));
    run_frames(&host, 1);
    assert_eq!(element.transform().scale, 1.7);
}

#[test]
fn overlapping_targets_stay_magnified_until_the_last_leave() {
    let host = Host::new(Size::new(400.0, 400.0));
    let page = host.page();
    page.insert("card", &["projects-box"], Rect::new(0.0, 0.0, 200.0, 200.0));
    page.insert("button", &["view-project-btn"], Rect::new(20.0, 150.0, 80.0, 30.0));
    let (effect, _) = mount(&host, Preset::Projects.config());

    host.pointer_move(Point::new(40.0, 160.0));
    assert_eq!(page.hovered().len(), 2);

    // out of the button, still inside the card
    host.pointer_move(Point::new(150.0, 160.0));
    assert_eq!(effect.cursor().scale, 1.8);

    host.pointer_move(Point::new(300.0, 300.0));
    assert_eq!(effect.cursor().scale, 1.0);
}

#[test]
fn teardown_is_idempotent_and_releases_everything() {
    let host = Host::new(Size::new(400.0, 400.0));
    host.page().insert("a", &["projects-box"], Rect::new(0.0, 0.0, 50.0, 50.0));
    host.page().insert("b", &["view-project-btn"], Rect::new(60.0, 0.0, 50.0, 50.0));
    let (mut effect, _) = mount(&host, Preset::Projects.config());
    assert_eq!(host.listener_count(), 6);
    assert_eq!(host.pending_frames(), 1);
    assert_eq!(host.page().observer_count(), 1);

    effect.teardown();
    effect.teardown();
    assert_eq!(effect.phase(), EffectPhase::Cancelled);
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.page().observer_count(), 0);
    assert_eq!(effect.hover_target_count(), 0);
}

#[test]
fn nothing_moves_after_teardown() {
    let host = Host::new(Size::new(200.0, 200.0));
    let (mut effect, element) = mount(&host, EffectConfig::default());
    run_frames(&host, 3);
    let writes = element.writes();
    let cursor = effect.cursor();

    effect.teardown();
    host.pointer_move(Point::new(10.0, 10.0));
    host.touch_move(vec![Point::new(20.0, 20.0)]);
    assert_eq!(host.run_frame(100_000_000), 0);

    assert_eq!(effect.pointer().point(), Point::new(100.0, 100.0));
    assert_eq!(effect.cursor(), cursor);
    assert_eq!(element.writes(), writes);
}

#[test]
fn targets_added_after_mount_are_tracked() {
    let host = Host::new(Size::new(400.0, 400.0));
    let (effect, element) = mount(&host, Preset::Contact.config());
    assert_eq!(effect.hover_target_count(), 0);

    let button = host.page().insert("Email", &["btn"], Rect::new(0.0, 0.0, 80.0, 20.0));
    host.page().insert("label", &["caption"], Rect::new(0.0, 40.0, 80.0, 20.0));
    assert_eq!(effect.hover_target_count(), 1);

    host.pointer_move(Point::new(10.0, 10.0));
    run_frames(&host, 1);
    assert_eq!(element.transform().scale, 1.8);

    // removing the hovered target counts as leaving it
    host.page().remove(button.id());
    run_frames(&host, 1);
    assert_eq!(effect.hover_target_count(), 0);
    assert_eq!(element.transform().scale, 1.0);
    assert!(!element.has_class(CursorClass::Hover));
}

#[test]
fn mutations_are_ignored_when_observation_is_off() {
    let host = Host::new(Size::new(400.0, 400.0));
    let config = EffectConfig {
        observe_mutations: false,
        ..Preset::Contact.config()
    };
    let (effect, _) = mount(&host, config);

    host.page().insert("Email", &["btn"], Rect::new(0.0, 0.0, 80.0, 20.0));
    assert_eq!(effect.hover_target_count(), 0);
}

#[test]
fn removed_hovered_target_resets_with_observation_off() {
    let host = Host::new(Size::new(400.0, 400.0));
    let page = host.page();
    let a = page.insert("a", &["btn"], Rect::new(0.0, 0.0, 80.0, 20.0));
    page.insert("b", &["btn"], Rect::new(100.0, 0.0, 80.0, 20.0));
    let config = EffectConfig {
        observe_mutations: false,
        ..Preset::Contact.config()
    };
    let (effect, element) = mount(&host, config);

    host.pointer_move(Point::new(10.0, 10.0));
    run_frames(&host, 1);
    assert_eq!(element.transform().scale, 1.8);

    page.remove(a.id());
    host.pointer_move(Point::new(300.0, 300.0));
    run_frames(&host, 1);
    assert_eq!(element.transform().scale, 1.0);

    host.pointer_move(Point::new(110.0, 10.0));
    host.pointer_move(Point::new(300.0, 300.0));
    run_frames(&host, 1);
    assert_eq!(effect.cursor().scale, 1.0);
    assert_eq!(element.transform().scale, 1.0);
    assert!(!element.has_class(CursorClass::Hover));
}

#[test]
fn teardown_while_hovered_restores_the_resting_cursor() {
    let host = Host::new(Size::new(400.0, 400.0));
    host.page().insert("card", &["projects-box"], Rect::new(0.0, 0.0, 100.0, 100.0));
    let (mut effect, element) = mount(&host, Preset::Projects.config());

    host.pointer_move(Point::new(50.0, 50.0));
    run_frames(&host, 1);
    assert!(element.has_class(CursorClass::Hover));

    effect.teardown();
    assert_eq!(effect.cursor().scale, 1.0);
    assert_eq!(element.class_name(), "site-cursor");
}

#[test]
fn touch_windows_hide_the_cursor_but_still_track() {
    let host = Host::new(Size::new(200.0, 200.0));
    host.window().set_touch_capable(true);
    let (effect, element) = mount(&host, EffectConfig::default());
    assert!(element.is_hidden());
    assert!(element.class_name().contains("cursor--hidden"));

    host.touch_move(vec![Point::new(30.0, 40.0), Point::new(180.0, 180.0)]);
    assert_eq!(effect.pointer().point(), Point::new(30.0, 40.0));

    let config = EffectConfig {
        hide_on_touch: false,
        ..EffectConfig::default()
    };
    let (_visible, element) = mount(&host, config);
    assert!(!element.is_hidden());
}

#[test]
fn empty_touch_lists_are_ignored() {
    let host = Host::new(Size::new(200.0, 200.0));
    let (effect, _) = mount(&host, EffectConfig::default());
    host.touch_move(Vec::new());
    assert_eq!(effect.pointer().point(), Point::new(100.0, 100.0));
}

proptest! {
    #[test]
    fn smoothing_never_overshoots(
        start in (-1000.0f64..1000.0, -1000.0f64..1000.0),
        target in (-1000.0f64..1000.0, -1000.0f64..1000.0),
        factor in 0.01f64..=1.0,
        frames in 1usize..60,
    ) {
        let integrator = SmoothingIntegrator::new(factor);
        let mut state = EffectState::at(Point::new(start.0, start.1));
        state.pointer.x = target.0;
        state.pointer.y = target.1;
        let target = Point::new(target.0, target.1);

        let mut distance = state.cursor.point().distance(target);
        for _ in 0..frames {
            let before = state.cursor;
            integrator.step(&mut state);
            let after = state.cursor.point().distance(target);
            prop_assert!(after <= distance + 1e-9);
            distance = after;

            // each axis stays between where it was and the pointer
            let (lo, hi) = (before.x.min(target.x), before.x.max(target.x));
            prop_assert!(state.cursor.x >= lo - 1e-9 && state.cursor.x <= hi + 1e-9);
            let (lo, hi) = (before.y.min(target.y), before.y.max(target.y));
            prop_assert!(state.cursor.y >= lo - 1e-9 && state.cursor.y <= hi + 1e-9);
        }
    }
}

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vizembed_core::{
    EmbedSize, EmbedWidth, ListenerCommand, PointerPosition, ResizeController, ResizeState,
    SizePolicy,
};

#[derive(Debug, Arbitrary)]
enum Step {
    Down { id: u8, x: i16, y: i16, measure: Option<u16> },
    Move { id: u8, x: i16, y: i16 },
    Up { id: u8, x: i16, y: i16, measure: Option<u16> },
    Cancel { id: Option<u8> },
    Blur,
    FitWidth,
    Height(u16),
    Take,
    Teardown,
}

#[derive(Debug, Arbitrary)]
struct Input {
    start_pixels: Option<u16>,
    start_height: u16,
    steps: Vec<Step>,
}

fn pos(x: i16, y: i16) -> PointerPosition {
    PointerPosition::new(f64::from(x), f64::from(y))
}

fuzz_target!(|input: Input| {
    let policy = SizePolicy::default();
    let mut controller = ResizeController::new(policy);
    let committed = EmbedSize {
        width: input
            .start_pixels
            .map_or(EmbedWidth::FULL, |px| EmbedWidth::Pixels(u32::from(px))),
        height: u32::from(input.start_height),
    };
    let mut attached = 0_i32;

    for step in input.steps.into_iter().take(256) {
        let dispatch = match step {
            Step::Down { id, x, y, measure } => controller.pointer_down(
                u32::from(id),
                pos(x, y),
                committed,
                || measure.map(f64::from),
            ),
            Step::Move { id, x, y } => controller.pointer_move(u32::from(id), pos(x, y)),
            Step::Up { id, x, y, measure } => {
                controller.pointer_up(u32::from(id), pos(x, y), || measure.map(f64::from))
            }
            Step::Cancel { id } => controller.pointer_cancel(id.map(u32::from)),
            Step::Blur => controller.blur(),
            Step::FitWidth => controller.fit_width(),
            Step::Height(h) => controller.height_preset(u32::from(h)),
            Step::Take => {
                if let Some(commit) = controller.take_commit() {
                    let size = commit.apply(committed, &policy);
                    assert!(size.height >= policy.min_height, "commit height below min");
                }
                continue;
            }
            Step::Teardown => controller.teardown(),
        };

        match dispatch.listener_command {
            Some(ListenerCommand::Attach) => attached += 1,
            Some(ListenerCommand::Detach) => attached -= 1,
            None => {}
        }
        assert!((0..=1).contains(&attached), "unbalanced listener commands");
        assert_eq!(
            attached == 1,
            controller.listeners_attached(),
            "listener bookkeeping diverged"
        );
        if let Some(live) = dispatch.live {
            assert!(live.width >= policy.min_width, "live width below min");
            assert!(live.height >= policy.min_height, "live height below min");
        }
        if let ResizeState::Dragging { live, .. } = controller.state() {
            assert!(live.width >= policy.min_width && live.height >= policy.min_height);
        }
    }
});

//! A centered box that changes its content on `enter`.
//!
//! Quit with `escape`, `q` or `C-c`. Logs go to `$TMPDIR/mentalitty/`.
//!
//! ```sh
//! cargo run --example hello_box
//! MENTALITTY_LOG=debug cargo run --example hello_box
//! ```

use mentalitty::logging::init_file_logging;
use mentalitty::{
    BorderKind, CrosstermBackend, Element, ElementOptions, Position, Rgba, Runtime, Screen,
    ScreenOptions, Size, StdinReader,
};
use mentalitty::element::{BorderOptions, ColorPair, StyleOptions};

fn build() -> mentalitty::Result<Screen> {
    let size = crossterm::terminal::size()?;
    let mut screen = Screen::new(
        ScreenOptions {
            smart_csr: true,
            ..Default::default()
        },
        size,
    );
    screen.set_title("MentaliTTY")?;

    let hello = screen.append(Element::new(ElementOptions {
        top: Some(Position::Center),
        left: Some(Position::Center),
        width: Some(Size::percent(50.0)),
        height: Some(Size::percent(50.0)),
        content: "Hello {bold}world{/bold}!".to_string(),
        tags: true,
        border: BorderOptions {
            kind: BorderKind::Line,
            ..Default::default()
        },
        style: StyleOptions {
            fg: Some(Rgba::WHITE),
            bg: Some(Rgba::MAGENTA),
            border: ColorPair {
                fg: Some(Rgba::try_from("#f0f0f0".to_string())?),
                bg: None,
            },
            hover: ColorPair {
                fg: None,
                bg: Some(Rgba::GREEN),
            },
            ..Default::default()
        },
        ..Default::default()
    }))?;

    screen.element_mut(hello)?.key("enter", move |screen, _key| {
        let element = screen.element_mut(hello)?;
        element.set_content("{right}Even different {black-fg}content{/black-fg}.{/right}\n");
        element.set_line(1, "bar");
        element.insert_line(1, "foo");
        screen.render()?;
        Ok(())
    });

    screen.key(["escape", "q", "C-c"], |screen, _key| {
        screen.exit(0);
        Ok(())
    });

    screen.focus(hello);
    screen.render()?;
    Ok(screen)
}

fn run() -> mentalitty::Result<i32> {
    let screen = build()?;
    let (_reader, input) = StdinReader::spawn()?;
    Runtime::new(screen, CrosstermBackend::new(), input)?
        .watch_signals()?
        .run()
}

fn main() {
    // Logging is optional; the demo still runs without it
    let log = init_file_logging(std::env::temp_dir().join("mentalitty")).ok();

    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "hello_box failed");
            eprintln!("hello_box: {err}");
            1
        }
    };
    drop(log);
    std::process::exit(code);
}

use anyhow::Context;
use crossbeam_channel as channel;
use std::io::BufRead;

use xtouch_mini_controls::{
    ctrl_surf::Notification,
    midi::{self, io},
    session::{Request, Session},
    XTouchMini,
};

const CLIENT_NAME: &str = "xtouch-mini-controls";
const DEFAULT_PORT: &str = "X-TOUCH MINI";

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match run() {
        Ok(()) => log::info!("Exiting"),
        Err(err) => {
            log::error!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Usage: `xtouch-mini [IN_PORT [OUT_PORT]]`
///
/// Port names are matched by substring. Type `r` + Enter to refresh
/// the device LEDs, `q` + Enter or Ctrl-D to quit.
fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let in_name = args.next().unwrap_or_else(|| DEFAULT_PORT.to_string());
    let out_name = args.next().unwrap_or_else(|| in_name.clone());

    let (midi_tx, midi_rx) = channel::unbounded();
    let midi_in = io::MidiIn::connect(CLIENT_NAME, &in_name, midi_tx)
        .with_context(|| format!("opening MIDI input {in_name}"))?;
    let midi_out = io::MidiOut::connect(CLIENT_NAME, &out_name)
        .with_context(|| format!("opening MIDI output {out_name}"))?;

    let mut device = XTouchMini::try_new(midi::Port::new(midi_out))?;

    let (notif_tx, notif_rx) = channel::unbounded();
    device.connect(notif_tx);
    device.refresh();

    // Stands for the remote UI mirroring the controls.
    let notif_thread = std::thread::spawn(move || {
        for notification in notif_rx.iter() {
            match notification {
                Notification::StateChanged { id, change } => log::info!("{id}: {change}"),
                Notification::Click(id) => log::info!("{id}: click"),
                Notification::Disposed(id) => log::debug!("{id}: disposed"),
            }
        }
    });

    let (req_tx, req_rx) = channel::unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let request = match line.as_deref().map(str::trim) {
                Ok("r") => Request::Refresh,
                Ok("q") | Err(_) => break,
                Ok(other) => {
                    log::warn!("Unknown command {other:?}");
                    continue;
                }
            };

            if req_tx.send(request).is_err() {
                return;
            }
        }

        let _ = req_tx.send(Request::Shutdown);
    });

    let (err_tx, err_rx) = channel::unbounded();
    let device = Session::new(device, err_tx).run(midi_rx, req_rx);
    drop(device);

    let err_count = err_rx.try_iter().count();
    if err_count > 0 {
        log::warn!("{err_count} error(s) reported during the session");
    }

    let _ = notif_thread.join();
    midi_in.close();

    Ok(())
}

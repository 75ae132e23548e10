mod analysis;
mod artifact;
mod client;
mod config;
mod cursor;
mod error;
mod host;
mod segment;
mod session;
mod speed;

use client::{Client, REPL_PROP_SPEED, REPL_PROP_TIME};

use std::os::raw::c_int;

use mpv_client::{mpv_handle, Event};

#[no_mangle]
extern "C" fn mpv_open_cplugin(handle: *mut mpv_handle) -> c_int {
    env_logger::init();

    let mut client = match Client::from_ptr(handle) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to start plugin: {}", e);
            return -1;
        }
    };

    log::debug!("Starting plugin skip-silence [{}]!", client.client_name());

    loop {
        match client.wait_event(client.event_timeout()) {
            Event::StartFile(_) => client.start_file(),
            Event::PropertyChange(REPL_PROP_TIME, _) => client.time_change(),
            Event::PropertyChange(REPL_PROP_SPEED, property) => {
                if let Some(speed) = property.data::<f64>() {
                    client.speed_change(speed);
                }
            }
            Event::ClientMessage(message) => {
                let args = message.args();
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                client.client_message(&args);
            }
            Event::EndFile => client.end_file(),
            Event::Shutdown => {
                client.shutdown();
                return 0;
            }
            _ => {}
        }

        client.poll_analysis();
    }
}

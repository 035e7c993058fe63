use std::fmt::Write as _;
use std::io::{stdout, Stdout, Write};

use crossbeam_channel::Receiver;
use crossterm::{cursor, terminal, Result, ExecutableCommand};

use shared_resources::direction::ButtonDirection;

use super::scheduler_status::SchedulerStatus;

pub struct Debug {
    stdout: Stdout,
    num_floors: u8,
    printed_lines: Option<u16>,
}

impl Debug {
    pub fn new(num_floors: u8) -> Self {
        Debug {
            stdout: stdout(),
            num_floors: num_floors,
            printed_lines: None,
        }
    }

    pub fn printstatus(&mut self, status: &SchedulerStatus) -> Result<()> {
        if let Some(lines) = self.printed_lines {
            self.stdout.execute(cursor::MoveUp(lines))?;
            self.stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        }
        let table = render(self.num_floors, status);
        write!(self.stdout, "{}", table)?;
        self.stdout.flush()?;
        self.printed_lines = Some(table.matches('\n').count() as u16);
        Ok(())
    }
}

fn render(num_floors: u8, status: &SchedulerStatus) -> String {
    let mut table = String::new();
    // writing into a String cannot fail
    let _ = write_table(&mut table, num_floors, status);
    table
}

fn write_table(table: &mut String, num_floors: u8, status: &SchedulerStatus) -> std::fmt::Result {
    writeln!(table, "+--------------------------------------+")?;
    writeln!(table, "| PENDING REQUESTS                     |")?;
    writeln!(table, "+------------+------------+------------+")?;
    writeln!(table, "| {0:<10} | {1:<10} | {2:<10} |", "FLOOR", "UP", "DOWN")?;
    for floor in (0..num_floors).rev() {
        writeln!(table, "+------------+------------+------------+")?;
        writeln!(
            table,
            "| {0:<10} | {1:<10} | {2:<10} |",
            floor,
            status.pending_at_floor(floor, ButtonDirection::Up),
            status.pending_at_floor(floor, ButtonDirection::Down),
        )?;
    }
    writeln!(table, "+------------+------------+------------+\n")?;

    writeln!(table, "+-------------------------+")?;
    writeln!(table, "| {0:<10} | {1:<10} |", "STATE", status.state.as_string())?;
    writeln!(table, "+------------+------------+")?;
    writeln!(table, "| {0:<10} | {1:<10} |", "COMPLETED", status.completed)?;
    writeln!(table, "+------------+------------+")?;
    Ok(())
}

/// Redraws the status table for every snapshot until the scheduler drops its sender.
pub fn main(num_floors: u8, status_rx: Receiver<SchedulerStatus>) -> Result<()> {
    let mut debug = Debug::new(num_floors);
    for status in status_rx.iter() {
        debug.printstatus(&status)?;
    }
    Ok(())
}

mod attendance_flow;
mod checklist_flow;
mod connection_pool;
mod registry;

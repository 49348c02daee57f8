mod payslip_orchestrator;

pub use payslip_orchestrator::PayslipOrchestrator;

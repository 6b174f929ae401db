//! Service and driver enumeration and control via the Service Control Manager
//!
//! One enumeration covers both Win32 services and kernel drivers; the
//! driver inventory is the same snapshot narrowed to driver-type entries.
//! Startup configuration is queried per service and degrades to `None`
//! when the config query is denied, rather than failing the whole refresh.

use tracing::trace;
use windows::core::PCWSTR;
use windows::Win32::Foundation::ERROR_SERVICE_DOES_NOT_EXIST;
use windows::Win32::System::Services::{
    ChangeServiceConfigW, ControlService, DeleteService, EnumServicesStatusExW, QueryServiceConfigW,
    StartServiceW, ENUM_SERVICE_STATUS_PROCESSW, ENUM_SERVICE_TYPE, QUERY_SERVICE_CONFIGW,
    SC_ENUM_PROCESS_INFO, SC_MANAGER_CONNECT, SC_MANAGER_ENUMERATE_SERVICE, SERVICE_AUTO_START,
    SERVICE_CHANGE_CONFIG, SERVICE_CONTROL_CONTINUE, SERVICE_CONTROL_PAUSE, SERVICE_CONTROL_STOP,
    SERVICE_DEMAND_START, SERVICE_DISABLED, SERVICE_DRIVER, SERVICE_ERROR, SERVICE_NO_CHANGE,
    SERVICE_PAUSE_CONTINUE, SERVICE_QUERY_CONFIG, SERVICE_START, SERVICE_START_TYPE, SERVICE_STATE_ALL,
    SERVICE_STATUS, SERVICE_STOP, SERVICE_WIN32,
};

use crate::core::{ActionError, ActionOutcome, ManagedEntity, Provider, RefreshError, Verb};
use crate::ffi::ScHandle;
use crate::model::{ServiceEntry, ServiceState, StartupType};
use crate::system::{enumerate_error, os_error};

// Standard DELETE access right; not re-exported by the Services module.
const DELETE_ACCESS: u32 = 0x0001_0000;

/// Enumerates every service and driver registered with the SCM.
pub struct ServiceProvider;

impl Provider<ServiceEntry> for ServiceProvider {
    fn snapshot(&mut self) -> Result<Vec<ServiceEntry>, RefreshError> {
        let scm = ScHandle::open_manager(SC_MANAGER_ENUMERATE_SERVICE)
            .map_err(|e| enumerate_error("services", e))?;

        let service_type = ENUM_SERVICE_TYPE(SERVICE_WIN32.0 | SERVICE_DRIVER.0);
        let mut bytes_needed = 0u32;
        let mut count = 0u32;
        let mut resume = 0u32;

        // First call sizes the buffer; ERROR_MORE_DATA is the expected
        // outcome and is not a failure.
        // SAFETY: all out-pointers reference live locals.
        let _ = unsafe {
            EnumServicesStatusExW(
                scm.as_raw(),
                SC_ENUM_PROCESS_INFO,
                service_type,
                SERVICE_STATE_ALL,
                None,
                &mut bytes_needed,
                &mut count,
                Some(&mut resume),
                PCWSTR::null(),
            )
        };

        let mut buffer = vec![0u8; bytes_needed as usize];
        resume = 0;
        // SAFETY: the buffer is sized from the probe call above.
        unsafe {
            EnumServicesStatusExW(
                scm.as_raw(),
                SC_ENUM_PROCESS_INFO,
                service_type,
                SERVICE_STATE_ALL,
                Some(&mut buffer),
                &mut bytes_needed,
                &mut count,
                Some(&mut resume),
                PCWSTR::null(),
            )
        }
        .map_err(|e| enumerate_error("services", e))?;

        // SAFETY: on success the buffer holds `count` contiguous
        // ENUM_SERVICE_STATUS_PROCESSW records.
        let records = unsafe {
            std::slice::from_raw_parts(
                buffer.as_ptr() as *const ENUM_SERVICE_STATUS_PROCESSW,
                count as usize,
            )
        };

        let mut services = Vec::with_capacity(records.len());
        for record in records {
            // SAFETY: the name pointers point into `buffer`, which outlives
            // this loop.
            let name = unsafe { record.lpServiceName.to_string() }.unwrap_or_default();
            let display_name = unsafe { record.lpDisplayName.to_string() }.unwrap_or_default();
            let status = &record.ServiceStatusProcess;
            let is_driver = (status.dwServiceType.0 & SERVICE_DRIVER.0) != 0;

            services.push(ServiceEntry {
                display_name,
                state: ServiceState::from_raw(status.dwCurrentState.0 as u32),
                accepted_controls: status.dwControlsAccepted,
                startup: query_startup(&scm, &name),
                is_driver,
                pid: (status.dwProcessId != 0).then_some(status.dwProcessId),
                name,
            });
        }

        Ok(services)
    }
}

/// Reads the configured start type for one service. Denied or failed
/// queries degrade the record instead of failing the refresh.
fn query_startup(scm: &ScHandle, name: &str) -> Option<StartupType> {
    let service = scm.open_service(name, SERVICE_QUERY_CONFIG).ok()?;

    let mut bytes_needed = 0u32;
    // SAFETY: probe call with a null buffer reports the required size.
    let _ = unsafe { QueryServiceConfigW(service.as_raw(), None, 0, &mut bytes_needed) };
    if bytes_needed == 0 {
        return None;
    }

    let mut buffer = vec![0u8; bytes_needed as usize];
    // SAFETY: the buffer is sized from the probe call and aligned enough
    // for QUERY_SERVICE_CONFIGW on all supported targets.
    unsafe {
        QueryServiceConfigW(
            service.as_raw(),
            Some(buffer.as_mut_ptr() as *mut QUERY_SERVICE_CONFIGW),
            bytes_needed,
            &mut bytes_needed,
        )
    }
    .ok()?;

    // SAFETY: on success the buffer starts with a valid config record.
    let config = unsafe { &*(buffer.as_ptr() as *const QUERY_SERVICE_CONFIGW) };
    Some(StartupType::from_raw(config.dwStartType.0))
}

/// Runs service control verbs against the SCM.
pub struct ServiceExecutor;

impl crate::core::Executor<ServiceEntry> for ServiceExecutor {
    fn run(&mut self, verb: Verb, target: &ServiceEntry) -> Result<ActionOutcome, ActionError> {
        trace!(service = %target.name, ?verb, "service control");
        match verb {
            Verb::StartService => {
                let service = open_target(target, SERVICE_START)?;
                // SAFETY: no arguments are passed to the service main.
                unsafe { StartServiceW(service.as_raw(), None) }
                    .map_err(|e| os_error("StartService", e))?;
                Ok(requested("Start", target))
            }
            Verb::StopService => {
                control(target, SERVICE_STOP, SERVICE_CONTROL_STOP, "StopService")?;
                Ok(requested("Stop", target))
            }
            Verb::PauseService => {
                control(
                    target,
                    SERVICE_PAUSE_CONTINUE,
                    SERVICE_CONTROL_PAUSE,
                    "PauseService",
                )?;
                Ok(requested("Pause", target))
            }
            Verb::ResumeService => {
                control(
                    target,
                    SERVICE_PAUSE_CONTINUE,
                    SERVICE_CONTROL_CONTINUE,
                    "ResumeService",
                )?;
                Ok(requested("Resume", target))
            }
            Verb::DeleteService => {
                let service = open_target(target, DELETE_ACCESS)?;
                // SAFETY: marks the service for deletion; the SCM removes it
                // once all handles are closed.
                unsafe { DeleteService(service.as_raw()) }
                    .map_err(|e| os_error("DeleteService", e))?;
                Ok(ActionOutcome::Requested(format!(
                    "Deletion of {} requested",
                    target.label()
                )))
            }
            Verb::SetStartupAuto => set_startup(target, SERVICE_AUTO_START, "Auto"),
            Verb::SetStartupManual => set_startup(target, SERVICE_DEMAND_START, "Manual"),
            Verb::SetStartupDisabled => set_startup(target, SERVICE_DISABLED, "Disabled"),
            _ => Err(ActionError::NotApplicable {
                action: "action",
                target: target.label(),
            }),
        }
    }
}

fn requested(what: &str, target: &ServiceEntry) -> ActionOutcome {
    ActionOutcome::Requested(format!("{} requested for {}", what, target.label()))
}

/// Opens the target service, mapping a missing service to the vanished
/// class rather than a generic OS rejection.
fn open_target(target: &ServiceEntry, access: u32) -> Result<ScHandle, ActionError> {
    let scm = ScHandle::open_manager(SC_MANAGER_CONNECT).map_err(|e| os_error("OpenSCManager", e))?;
    scm.open_service(&target.name, access).map_err(|e| {
        if e.code() == ERROR_SERVICE_DOES_NOT_EXIST.to_hresult() {
            ActionError::TargetVanished {
                id: target.name.clone(),
            }
        } else {
            os_error("OpenService", e)
        }
    })
}

fn control(
    target: &ServiceEntry,
    access: u32,
    code: u32,
    operation: &'static str,
) -> Result<(), ActionError> {
    let service = open_target(target, access)?;
    let mut status = SERVICE_STATUS::default();
    // SAFETY: `status` receives the service's last reported state.
    unsafe { ControlService(service.as_raw(), code, &mut status) }
        .map_err(|e| os_error(operation, e))?;
    Ok(())
}

fn set_startup(
    target: &ServiceEntry,
    start_type: SERVICE_START_TYPE,
    label: &str,
) -> Result<ActionOutcome, ActionError> {
    let service = open_target(target, SERVICE_CHANGE_CONFIG)?;
    // SAFETY: every parameter except the start type is SERVICE_NO_CHANGE or
    // null, leaving the rest of the configuration untouched.
    unsafe {
        ChangeServiceConfigW(
            service.as_raw(),
            ENUM_SERVICE_TYPE(SERVICE_NO_CHANGE),
            start_type,
            SERVICE_ERROR(SERVICE_NO_CHANGE),
            PCWSTR::null(),
            PCWSTR::null(),
            None,
            PCWSTR::null(),
            PCWSTR::null(),
            PCWSTR::null(),
            PCWSTR::null(),
        )
    }
    .map_err(|e| os_error("ChangeServiceConfig", e))?;
    Ok(ActionOutcome::Requested(format!(
        "Startup of {} set to {}",
        target.label(),
        label
    )))
}
